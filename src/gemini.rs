//! Client for the Google Generative Language `generateContent` endpoint.
//!
//! One request per analysis, no retries: duplicate submissions are cheap for
//! the caller, while silent re-attempts here would multiply billed calls.

use anyhow::Context as _;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const IMAGE_MIME_TYPE: &str = "image/jpeg";

// Sampling is pinned low-variance; the model is asked for structured output,
// not prose.
const TEMPERATURE: f64 = 0.3;
const TOP_P: f64 = 0.9;
const TOP_K: i32 = 40;

#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Issues a single generation call and returns the raw text of all
    /// returned candidates, joined by newline.
    async fn generate(&self, prompt: &str, image_base64: Option<&str>) -> anyhow::Result<String>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize, Deserialize)]
struct InlineData {
    #[serde(rename = "mimeType")]
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f64,
    #[serde(rename = "topP")]
    top_p: f64,
    #[serde(rename = "topK")]
    top_k: i32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

pub struct GeminiClient {
    api_key: String,
    model: String,
    base_url: String,
    client: Client,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: API_BASE_URL.to_string(),
            client: Client::new(),
        }
    }

    #[cfg(test)]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn build_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        )
    }

    fn build_request(prompt: &str, image_base64: Option<&str>) -> GenerateRequest {
        let mut parts = vec![Part::Text {
            text: prompt.to_string(),
        }];
        if let Some(data) = image_base64 {
            parts.push(Part::InlineData {
                inline_data: InlineData {
                    mime_type: IMAGE_MIME_TYPE.to_string(),
                    data: data.to_string(),
                },
            });
        }
        GenerateRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts,
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                top_p: TOP_P,
                top_k: TOP_K,
            },
        }
    }

    fn collect_text(response: &GenerateResponse) -> String {
        response
            .candidates
            .as_deref()
            .unwrap_or_default()
            .iter()
            .filter_map(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| match p {
                        Part::Text { text } => Some(text.as_str()),
                        Part::InlineData { .. } => None,
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate(&self, prompt: &str, image_base64: Option<&str>) -> anyhow::Result<String> {
        let body = Self::build_request(prompt, image_base64);
        debug!(model = %self.model, with_image = image_base64.is_some(), "calling generateContent");

        let response = self
            .client
            .post(self.build_url())
            .json(&body)
            .send()
            .await
            .context("gemini http request")?;

        let status = response.status();
        let text = response.text().await.context("gemini read response")?;
        if !status.is_success() {
            error!(%status, "gemini api error");
            anyhow::bail!("gemini api returned {}: {}", status, text);
        }

        let parsed: GenerateResponse =
            serde_json::from_str(&text).context("gemini response parse")?;
        if let Some(err) = parsed.error {
            anyhow::bail!("gemini api error: {}", err.message);
        }

        Ok(Self::collect_text(&parsed))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[test]
    fn request_carries_one_user_message_with_fixed_sampling() {
        let req = GeminiClient::build_request("describe this", None);
        let value = serde_json::to_value(&req).unwrap();

        assert_eq!(
            value,
            json!({
                "contents": [{
                    "role": "user",
                    "parts": [{"text": "describe this"}],
                }],
                "generationConfig": {
                    "temperature": 0.3,
                    "topP": 0.9,
                    "topK": 40,
                },
            })
        );
    }

    #[test]
    fn image_payload_becomes_an_inline_jpeg_part() {
        let req = GeminiClient::build_request("describe this", Some("QUJD"));
        let value = serde_json::to_value(&req).unwrap();

        assert_eq!(
            value["contents"][0]["parts"],
            json!([
                {"text": "describe this"},
                {"inlineData": {"mimeType": "image/jpeg", "data": "QUJD"}},
            ])
        );
    }

    #[test]
    fn candidate_texts_are_joined_by_newline() {
        let response: GenerateResponse = serde_json::from_value(json!({
            "candidates": [
                {"content": {"role": "model", "parts": [{"text": "{\"a\":"}, {"text": "1}"}]}},
                {"content": {"role": "model", "parts": [{"text": "tail"}]}},
            ],
        }))
        .unwrap();

        assert_eq!(GeminiClient::collect_text(&response), "{\"a\":\n1}\ntail");
    }

    #[test]
    fn missing_candidates_collapse_to_empty_text() {
        let response: GenerateResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(GeminiClient::collect_text(&response), "");

        let response: GenerateResponse =
            serde_json::from_value(json!({"candidates": [{}]})).unwrap();
        assert_eq!(GeminiClient::collect_text(&response), "");
    }

    #[tokio::test]
    async fn generate_returns_the_model_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/test-model:generateContent"))
            .and(query_param("key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": {"role": "model", "parts": [{"text": "{\"calories\": 42}"}]},
                }],
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = GeminiClient::new("test-key", "test-model").with_base_url(server.uri());
        let text = client.generate("an apple", None).await.unwrap();
        assert_eq!(text, "{\"calories\": 42}");
    }

    #[tokio::test]
    async fn upstream_failure_surfaces_as_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                "error": {"message": "quota exceeded"},
            })))
            .mount(&server)
            .await;

        let client = GeminiClient::new("test-key", "test-model").with_base_url(server.uri());
        let err = client.generate("an apple", None).await.unwrap_err();
        assert!(err.to_string().contains("gemini api returned"));
    }
}
