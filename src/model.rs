use serde::{Deserialize, Serialize};

use crate::ingredients::{parse_line, ParsedIngredientLine};

/// A recipe produced by extraction. Never persisted as-is; callers map it into
/// their own records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportedRecipe {
    pub title: String,
    pub description: Option<String>,
    pub ingredients: Vec<ImportedIngredient>,
    pub instructions: Vec<ImportedInstruction>,
    pub yield_quantity: Option<f64>,
    pub yield_unit: Option<String>,
    pub prep_minutes: Option<u32>,
    pub cook_minutes: Option<u32>,
    pub difficulty: Option<Difficulty>,
    pub source_url: Option<String>,
    pub source_name: Option<String>,
    pub author: Option<String>,
    pub cover_image_url: Option<String>,
    pub tags: Vec<String>,
    /// Offset into the source video where the recipe starts.
    pub video_start_seconds: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportedIngredient {
    pub quantity: Option<f64>,
    pub quantity_max: Option<f64>,
    pub unit: Option<String>,
    pub name: String,
    pub preparation: Option<String>,
    pub notes: Option<String>,
    pub is_optional: bool,
    pub original_text: Option<String>,
}

impl ImportedIngredient {
    /// Parse a raw ingredient line. Blank lines and headers yield `None`.
    pub fn from_text(text: &str) -> Option<Self> {
        let parsed = parse_line(text);
        if parsed.is_empty() {
            None
        } else {
            Some(parsed.into())
        }
    }
}

impl From<ParsedIngredientLine> for ImportedIngredient {
    fn from(parsed: ParsedIngredientLine) -> Self {
        ImportedIngredient {
            is_optional: parsed.is_optional(),
            original_text: Some(parsed.original_text().to_string()),
            quantity: parsed.quantity,
            quantity_max: parsed.quantity_max,
            unit: parsed.unit,
            name: parsed.name,
            preparation: parsed.preparation,
            notes: parsed.notes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportedInstruction {
    /// 1-based position in the recipe.
    pub step_number: u32,
    pub text: String,
    /// Section heading when the source grouped its steps.
    pub section: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "easy" | "simple" | "beginner" => Some(Difficulty::Easy),
            "medium" | "moderate" | "intermediate" => Some(Difficulty::Medium),
            "hard" | "difficult" | "advanced" | "challenging" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

/// Number instruction texts 1..n, dropping blank entries.
pub fn number_steps<I>(steps: I) -> Vec<ImportedInstruction>
where
    I: IntoIterator<Item = (Option<String>, String)>,
{
    steps
        .into_iter()
        .map(|(section, text)| (section, text.trim().to_string()))
        .filter(|(_, text)| !text.is_empty())
        .enumerate()
        .map(|(index, (section, text))| ImportedInstruction {
            step_number: index as u32 + 1,
            text,
            section,
        })
        .collect()
}
