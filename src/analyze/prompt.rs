/// Instruction block prepended to every analysis prompt. The model is told to
/// answer with bare JSON; extraction still assumes it might not (see
/// `extract.rs`).
pub const NUTRIENTS_TEMPLATE: &str = r#"
You are a nutrition analyzer. Given a description of a food item, provide a structured JSON with the following fields:

{
  "calories": number (kcal),
  "protein": number (grams),
  "carbohydrates": number (grams),
  "sugar": number (grams),
  "fiber": number (grams),
  "fat_total": number (grams),
  "saturated_fat": number (grams),
  "monounsaturated_fat": number (grams),
  "polyunsaturated_fat": number (grams),
  "omega3": number (grams),
  "omega6": number (grams),
  "vitamin_c": number (mg),
  "vitamin_a": number (µg),
  "vitamin_d": number (µg),
  "vitamin_b12": number (µg),
  "calcium": number (mg),
  "iron": number (mg),
  "magnesium": number (mg),
  "potassium": number (mg),
  "sodium": number (mg),
  "polyphenols": number (mg),
  "trans_fat": number (grams)
}

Rules:
- Include only nutrients that have significant health impact.
- If a value is unknown, return 0.
- Do not include unnecessary elements.
- Output only valid JSON, no extra text.
"#;

/// Stands in for the description when the user sent only a photo.
pub const FALLBACK_DESCRIPTION: &str = "Food item";

pub fn build_prompt(description: Option<&str>) -> String {
    let description = match description {
        Some(d) if !d.trim().is_empty() => d,
        _ => FALLBACK_DESCRIPTION,
    };
    format!("{NUTRIENTS_TEMPLATE}\nFood description: {description}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_is_appended_after_the_template() {
        let prompt = build_prompt(Some("grilled salmon with rice"));
        assert!(prompt.starts_with(NUTRIENTS_TEMPLATE));
        assert!(prompt.ends_with("Food description: grilled salmon with rice"));
    }

    #[test]
    fn missing_or_blank_description_falls_back_to_placeholder() {
        for description in [None, Some(""), Some("   ")] {
            let prompt = build_prompt(description);
            assert!(prompt.ends_with("Food description: Food item"));
        }
    }

    #[test]
    fn template_names_the_schema_and_the_rules() {
        for needle in [
            "\"calories\": number (kcal)",
            "\"trans_fat\": number (grams)",
            "If a value is unknown, return 0.",
            "Output only valid JSON, no extra text.",
        ] {
            assert!(NUTRIENTS_TEMPLATE.contains(needle), "missing: {needle}");
        }
    }
}
