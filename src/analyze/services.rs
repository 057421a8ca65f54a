use base64::{engine::general_purpose, Engine as _};
use tracing::debug;

use super::dto::{AnalyzeRequest, NutrientRecord};
use super::error::AnalyzeError;
use super::extract::extract_json;
use super::prompt::build_prompt;
use crate::state::AppState;

/// Runs one analysis end to end: validate, resolve the image, build the
/// prompt, invoke the model once, extract the nutrient record. Strictly
/// sequential; the image must be in hand before the model call starts.
pub async fn analyze_food(
    st: &AppState,
    req: AnalyzeRequest,
) -> Result<NutrientRecord, AnalyzeError> {
    validate(&req)?;

    let image_base64 = resolve_image(st, req.image_id.as_deref()).await?;
    let prompt = build_prompt(req.description.as_deref());

    let raw = st
        .model
        .generate(&prompt, image_base64.as_deref())
        .await
        .map_err(|e| AnalyzeError::ModelInvocation(format!("{e:#}")))?;

    debug!(raw_len = raw.len(), "model reply collected");
    extract_json(&raw)
}

fn validate(req: &AnalyzeRequest) -> Result<(), AnalyzeError> {
    let has_description = req
        .description
        .as_deref()
        .is_some_and(|d| !d.trim().is_empty());
    let has_image = req.image_id.as_deref().is_some_and(|id| !id.trim().is_empty());
    if !has_description && !has_image {
        return Err(AnalyzeError::Validation);
    }
    Ok(())
}

/// No image id means no storage round-trip at all. An id that does not
/// resolve fails the request here, before any model cost is incurred.
async fn resolve_image(
    st: &AppState,
    image_id: Option<&str>,
) -> Result<Option<String>, AnalyzeError> {
    let Some(id) = image_id.map(str::trim).filter(|id| !id.is_empty()) else {
        return Ok(None);
    };

    let bytes = st
        .storage
        .download(id)
        .await
        .map_err(|e| AnalyzeError::ImageFetch {
            id: id.to_string(),
            reason: format!("{e:#}"),
        })?;

    debug!(%id, size = bytes.len(), "image resolved");
    Ok(Some(general_purpose::STANDARD.encode(&bytes)))
}
