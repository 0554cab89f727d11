//! Validation of untrusted model output into recipes.

use super::schema::{clean_text, parse_duration_minutes, push_tags, RecipeYield};
use crate::model::{number_steps, Difficulty, ImportedIngredient, ImportedRecipe};
use log::{debug, warn};
use serde::Deserialize;
use serde_json::Value;

/// One recipe as a model reported it. Every field is optional because model
/// output is not trusted to follow the requested shape.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RecipeCandidate {
    #[serde(alias = "name")]
    pub title: Option<String>,
    pub description: Option<String>,
    pub ingredients: Vec<Value>,
    #[serde(alias = "steps")]
    pub instructions: Vec<Value>,
    #[serde(alias = "servings", alias = "yield")]
    pub yield_quantity: Option<Value>,
    pub yield_unit: Option<String>,
    pub prep_minutes: Option<Value>,
    pub cook_minutes: Option<Value>,
    pub difficulty: Option<String>,
    pub tags: Vec<String>,
    pub video_start_seconds: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CandidateEnvelope {
    Wrapped { recipes: Vec<Value> },
    List(Vec<Value>),
    Single(Value),
}

#[derive(Debug, Deserialize)]
struct IngredientObject {
    #[serde(default)]
    quantity: Option<Value>,
    #[serde(default)]
    quantity_max: Option<Value>,
    #[serde(default)]
    unit: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    preparation: Option<String>,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default, alias = "is_optional")]
    optional: bool,
    #[serde(default)]
    original_text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct InstructionObject {
    #[serde(default)]
    step_number: Option<Value>,
    #[serde(default, alias = "instruction")]
    text: Option<String>,
    #[serde(default)]
    section: Option<String>,
}

/// Turn raw model output into validated recipes. Malformed candidates and
/// candidates without a title are dropped; an unparseable response yields an
/// empty list.
pub fn parse_candidates(raw: &str, source_url: Option<&str>) -> Vec<ImportedRecipe> {
    let body = strip_code_fence(raw);
    let envelope: CandidateEnvelope = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(e) => {
            warn!("Model response is not valid JSON: {}", e);
            return Vec::new();
        }
    };

    let values = match envelope {
        CandidateEnvelope::Wrapped { recipes } => recipes,
        CandidateEnvelope::List(values) => values,
        CandidateEnvelope::Single(value) if value.is_object() => vec![value],
        CandidateEnvelope::Single(_) => Vec::new(),
    };

    values
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<RecipeCandidate>(value) {
            Ok(candidate) => candidate.into_recipe(source_url),
            Err(e) => {
                debug!("Skipping malformed recipe candidate: {}", e);
                None
            }
        })
        .collect()
}

impl RecipeCandidate {
    /// Validate and normalize. `None` when the candidate has no usable title.
    pub fn into_recipe(self, source_url: Option<&str>) -> Option<ImportedRecipe> {
        let title = self.title.as_deref().map(clean_text).unwrap_or_default();
        if title.is_empty() {
            debug!("Dropping recipe candidate without a title");
            return None;
        }

        let ingredients = self.ingredients.iter().filter_map(candidate_ingredient).collect();

        let mut steps: Vec<(u32, usize, Option<String>, String)> = self
            .instructions
            .iter()
            .enumerate()
            .filter_map(|(position, value)| candidate_step(value, position))
            .collect();
        steps.sort_by_key(|(step_number, position, _, _)| (*step_number, *position));
        let instructions = number_steps(steps.into_iter().map(|(_, _, section, text)| (section, text)));

        let yield_amount = self.yield_quantity.and_then(|value| match value {
            Value::Number(n) => n.as_f64().and_then(|n| RecipeYield::Number(n).normalize()),
            Value::String(s) => RecipeYield::Text(s).normalize(),
            _ => None,
        });
        let yield_unit = self
            .yield_unit
            .map(|u| clean_text(&u))
            .filter(|u| !u.is_empty())
            .or_else(|| yield_amount.as_ref().and_then(|y| y.unit.clone()));

        let mut tags = Vec::new();
        for tag in &self.tags {
            push_tags(&mut tags, tag);
        }

        Some(ImportedRecipe {
            title,
            description: self.description.map(|d| clean_text(&d)).filter(|d| !d.is_empty()),
            ingredients,
            instructions,
            yield_quantity: yield_amount.map(|y| y.quantity),
            yield_unit,
            prep_minutes: self.prep_minutes.as_ref().and_then(minutes_value),
            cook_minutes: self.cook_minutes.as_ref().and_then(minutes_value),
            difficulty: self.difficulty.as_deref().and_then(Difficulty::from_label),
            source_url: source_url.map(str::to_string),
            source_name: None,
            author: None,
            cover_image_url: None,
            tags,
            video_start_seconds: self.video_start_seconds.as_ref().and_then(seconds_value),
        })
    }
}

fn candidate_ingredient(value: &Value) -> Option<ImportedIngredient> {
    match value {
        Value::String(text) => ImportedIngredient::from_text(text),
        Value::Object(_) => {
            let object: IngredientObject = serde_json::from_value(value.clone()).ok()?;
            let name = object.name.as_deref().map(clean_text).unwrap_or_default();
            if name.is_empty() {
                // Some models only fill in the raw line
                return object.original_text.as_deref().and_then(ImportedIngredient::from_text);
            }
            let notes = object.notes.filter(|n| !n.trim().is_empty());
            let is_optional = object.optional
                || notes
                    .as_deref()
                    .is_some_and(|n| n.to_lowercase().contains("optional"));
            Some(ImportedIngredient {
                quantity: object.quantity.as_ref().and_then(number_value),
                quantity_max: object.quantity_max.as_ref().and_then(number_value),
                unit: object
                    .unit
                    .map(|u| u.trim().to_string())
                    .filter(|u| !u.is_empty())
                    .map(|u| crate::ingredients::canonical_unit(&u).map(str::to_string).unwrap_or(u)),
                name,
                preparation: object.preparation.filter(|p| !p.trim().is_empty()),
                notes,
                is_optional,
                original_text: object.original_text,
            })
        }
        _ => None,
    }
}

fn candidate_step(value: &Value, position: usize) -> Option<(u32, usize, Option<String>, String)> {
    let fallback = position as u32 + 1;
    match value {
        Value::String(text) => Some((fallback, position, None, clean_text(text))),
        Value::Object(_) => {
            let object: InstructionObject = serde_json::from_value(value.clone()).ok()?;
            let step_number = object
                .step_number
                .as_ref()
                .and_then(number_value)
                .map(|n| n as u32)
                .unwrap_or(fallback);
            let section = object.section.map(|s| clean_text(&s)).filter(|s| !s.is_empty());
            Some((step_number, position, section, clean_text(object.text.as_deref()?)))
        }
        _ => None,
    }
}

/// A JSON number, or a string holding one. Negative and non-finite values
/// are rejected.
fn number_value(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    (n.is_finite() && n >= 0.0).then_some(n)
}

fn minutes_value(value: &Value) -> Option<u32> {
    match value {
        Value::String(s) => parse_duration_minutes(s),
        other => number_value(other).map(|n| n.round() as u32),
    }
}

fn seconds_value(value: &Value) -> Option<u32> {
    number_value(value).map(|n| n.round() as u32)
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the language tag on the opening fence
    let rest = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_envelope_with_mixed_ingredients() {
        let raw = r#"
        ```json
        {"recipes": [{
            "title": "Pancakes",
            "ingredients": [
                "1 1/2 cups flour",
                {"quantity": 2, "unit": "tbsp", "name": "sugar"},
                {"name": "blueberries", "optional": true}
            ],
            "instructions": [
                {"step_number": 2, "text": "Cook on a hot griddle."},
                {"step_number": 1, "text": "Whisk everything together."}
            ],
            "servings": 4,
            "difficulty": "Easy",
            "video_start_seconds": 95
        }]}
        ```
        "#;

        let recipes = parse_candidates(raw, Some("https://example.com/pancakes"));
        assert_eq!(recipes.len(), 1);
        let recipe = &recipes[0];
        assert_eq!(recipe.title, "Pancakes");
        assert_eq!(recipe.ingredients.len(), 3);
        assert_eq!(recipe.ingredients[0].quantity, Some(1.5));
        assert_eq!(recipe.ingredients[1].unit.as_deref(), Some("tablespoon"));
        assert!(recipe.ingredients[2].is_optional);
        assert_eq!(recipe.instructions[0].step_number, 1);
        assert_eq!(recipe.instructions[0].text, "Whisk everything together.");
        assert_eq!(recipe.instructions[1].step_number, 2);
        assert_eq!(recipe.yield_quantity, Some(4.0));
        assert_eq!(recipe.difficulty, Some(Difficulty::Easy));
        assert_eq!(recipe.video_start_seconds, Some(95));
        assert_eq!(recipe.source_url.as_deref(), Some("https://example.com/pancakes"));
    }

    #[test]
    fn test_drops_untitled_and_malformed_candidates() {
        let raw = r#"[
            {"title": "", "ingredients": ["1 egg"]},
            {"title": "Soup", "instructions": ["Boil", "", "Serve"]},
            {"title": 42},
            "not a recipe"
        ]"#;
        let recipes = parse_candidates(raw, None);
        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].title, "Soup");
        let numbers: Vec<u32> = recipes[0].instructions.iter().map(|i| i.step_number).collect();
        assert_eq!(numbers, vec![1, 2]);
    }

    #[test]
    fn test_invalid_json_is_empty() {
        assert!(parse_candidates("I could not find a recipe.", None).is_empty());
        assert!(parse_candidates(r#"{"recipes": []}"#, None).is_empty());
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```json\n[1]\n```"), "[1]");
        assert_eq!(strip_code_fence("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fence("  []  "), "[]");
    }
}
