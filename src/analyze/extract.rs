use super::dto::NutrientRecord;
use super::error::AnalyzeError;

/// Parses the first-`{`-to-last-`}` span of `raw` as a JSON object.
///
/// Models wrap their output in prose or markdown fences often enough that the
/// span heuristic is load-bearing: anything before the first `{` and after
/// the last `}` is dropped. A stray brace inside surrounding prose widens the
/// span and fails the parse; the instruction template forbids extra text, so
/// that case stays a hard failure rather than something to guess around.
pub fn extract_json(raw: &str) -> Result<NutrientRecord, AnalyzeError> {
    let (start, end) = match (raw.find('{'), raw.rfind('}')) {
        (Some(start), Some(end)) if start < end => (start, end),
        _ => {
            return Err(AnalyzeError::Extraction(
                "No valid JSON object found".to_string(),
            ))
        }
    };

    let span = &raw[start..=end];
    serde_json::from_str(span)
        .map_err(|e| AnalyzeError::Extraction(format!("invalid JSON in model output: {e}")))
}
