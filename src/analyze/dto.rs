use serde::{Deserialize, Serialize};

/// Body of `POST /analyze_food`. At least one of the two fields must carry
/// something; the image id is an object-storage key written by the upload
/// flow.
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub description: Option<String>,
    pub image_id: Option<String>,
}

/// Flat nutrient-name → amount mapping parsed out of the model reply.
///
/// Kept as the raw JSON object on purpose: the model is instructed to emit a
/// known key set but may legitimately omit insignificant nutrients, and
/// consumers read absent keys as zero. Forcing a typed schema here would
/// reject replies the contract accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NutrientRecord(pub serde_json::Map<String, serde_json::Value>);
