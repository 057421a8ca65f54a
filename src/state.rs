use std::sync::Arc;

use crate::config::AppConfig;
use crate::gemini::{GeminiClient, GenerativeModel};
use crate::storage::{Storage, StorageClient};

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn StorageClient>,
    pub model: Arc<dyn GenerativeModel>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;

        let storage = Arc::new(
            Storage::new(
                &config.storage.endpoint,
                &config.storage.bucket,
                &config.storage.access_key,
                &config.storage.secret_key,
                "us-east-1",
            )
            .await?,
        ) as Arc<dyn StorageClient>;

        let model = Arc::new(GeminiClient::new(config.gemini.api_key, config.gemini.model))
            as Arc<dyn GenerativeModel>;

        Ok(Self { storage, model })
    }

    pub fn from_parts(storage: Arc<dyn StorageClient>, model: Arc<dyn GenerativeModel>) -> Self {
        Self { storage, model }
    }
}
