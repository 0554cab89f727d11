//! Free-text ingredient line parsing.
//!
//! [`parse_line`] never fails: anything it cannot resolve is left as `None`
//! and, in the worst case, the whole line becomes the ingredient name.

mod clauses;
mod quantity;
mod units;

pub use units::{canonical_unit, normalize_unit};

use clauses::{collapse_whitespace, split_name_preparation, strip_trailing_notes, take_size_token};
use quantity::extract_quantity;
use serde::{Deserialize, Serialize};
use units::extract_unit;

/// Structured form of one ingredient line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedIngredientLine {
    pub quantity: Option<f64>,
    /// Upper bound when the line gives a range ("1-2 cups").
    pub quantity_max: Option<f64>,
    /// Canonical unit name.
    pub unit: Option<String>,
    pub name: String,
    pub preparation: Option<String>,
    pub notes: Option<String>,
    original_text: String,
}

impl ParsedIngredientLine {
    fn empty(original_text: &str) -> Self {
        ParsedIngredientLine {
            quantity: None,
            quantity_max: None,
            unit: None,
            name: String::new(),
            preparation: None,
            notes: None,
            original_text: original_text.to_string(),
        }
    }

    /// The line exactly as it was given to the parser.
    pub fn original_text(&self) -> &str {
        &self.original_text
    }

    pub fn is_optional(&self) -> bool {
        self.notes
            .as_deref()
            .is_some_and(|notes| notes.to_lowercase().contains("optional"))
    }

    /// Blank lines and section headers parse to an empty name.
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }
}

/// Parse one free-text ingredient line.
pub fn parse_line(text: &str) -> ParsedIngredientLine {
    let cleaned = clean_line(text);
    if cleaned.is_empty() || is_section_header(&cleaned) {
        return ParsedIngredientLine::empty(text);
    }

    let mut parsed = ParsedIngredientLine::empty(text);
    let mut rest = cleaned.as_str();

    if let Some(quantity) = extract_quantity(rest) {
        parsed.quantity = Some(quantity.value);
        parsed.quantity_max = quantity.max;
        rest = rest[quantity.consumed..].trim_start();
    }

    let mut size_token = None;
    if parsed.quantity.is_some() {
        if let Some((token, after)) = take_size_token(rest) {
            size_token = Some(token);
            rest = after;
        }
    }

    if let Some((unit, after)) = extract_unit(rest) {
        parsed.unit = Some(unit.to_string());
        rest = after;
    }
    rest = strip_of(rest);

    // The package size belongs to the name, not the unit.
    let spliced;
    if let Some(token) = size_token {
        spliced = format!("{token} {rest}");
        rest = spliced.as_str();
    }

    let (rest, mut notes) = strip_trailing_notes(rest);
    let split = split_name_preparation(rest);
    if let Some(note) = split.note {
        notes.push(note);
    }

    parsed.name = collapse_whitespace(&split.name);
    parsed.preparation = split.preparation.map(|p| collapse_whitespace(&p));
    if !notes.is_empty() {
        parsed.notes = Some(notes.join(", "));
    }

    if parsed.name.is_empty() {
        // Nothing left for the name: keep the whole line, and any quantity.
        let mut fallback = ParsedIngredientLine::empty(text);
        fallback.quantity = parsed.quantity;
        fallback.quantity_max = parsed.quantity_max;
        fallback.name = cleaned;
        return fallback;
    }

    parsed
}

/// Dedup key form of an ingredient name: lowercase, single spaces, no
/// surrounding punctuation.
pub fn normalize_name(name: &str) -> String {
    collapse_whitespace(&name.to_lowercase())
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_string()
}

fn clean_line(text: &str) -> String {
    let text = text.replace('\u{2044}', "/");
    let text = text
        .trim()
        .trim_start_matches(['•', '*', '▢', '·', '☐'])
        .trim_start();
    let text = text.strip_prefix("- ").unwrap_or(text);
    collapse_whitespace(text)
}

fn is_section_header(text: &str) -> bool {
    text.ends_with(':') && extract_quantity(text).is_none()
}

fn strip_of(text: &str) -> &str {
    match text.get(..3) {
        Some(head) if head.eq_ignore_ascii_case("of ") => text[3..].trim_start(),
        _ => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unicode_fraction_line() {
        let parsed = parse_line("½ cup sugar");
        assert_eq!(parsed.quantity, Some(0.5));
        assert_eq!(parsed.unit.as_deref(), Some("cup"));
        assert_eq!(parsed.name, "sugar");
    }

    #[test]
    fn test_optional_note() {
        let parsed = parse_line("2 tsp vanilla extract, optional");
        assert_eq!(parsed.quantity, Some(2.0));
        assert_eq!(parsed.unit.as_deref(), Some("teaspoon"));
        assert_eq!(parsed.name, "vanilla extract");
        assert!(parsed.notes.as_deref().unwrap().contains("optional"));
        assert!(parsed.is_optional());
    }

    #[test]
    fn test_range_line() {
        let parsed = parse_line("1-2 cups milk");
        assert_eq!(parsed.quantity, Some(1.0));
        assert_eq!(parsed.quantity_max, Some(2.0));
        assert_eq!(parsed.unit.as_deref(), Some("cup"));
        assert_eq!(parsed.name, "milk");
    }

    #[test]
    fn test_size_token_stays_in_name() {
        let parsed = parse_line("2 14oz cans diced tomatoes");
        assert_eq!(parsed.quantity, Some(2.0));
        assert_eq!(parsed.unit.as_deref(), Some("can"));
        assert_eq!(parsed.name, "14oz diced tomatoes");
    }

    #[test]
    fn test_preparation_split() {
        let parsed = parse_line("1 large onion, finely diced");
        assert_eq!(parsed.quantity, Some(1.0));
        assert_eq!(parsed.unit, None);
        assert_eq!(parsed.name, "large onion");
        assert_eq!(parsed.preparation.as_deref(), Some("finely diced"));
    }

    #[test]
    fn test_comma_without_keyword_keeps_name() {
        let parsed = parse_line("1 cup cheddar, gruyere");
        assert_eq!(parsed.name, "cheddar, gruyere");
        assert!(parsed.preparation.is_none());
    }

    #[test]
    fn test_pinch_of() {
        let parsed = parse_line("a pinch of salt");
        assert_eq!(parsed.quantity, Some(1.0));
        assert_eq!(parsed.unit.as_deref(), Some("pinch"));
        assert_eq!(parsed.name, "salt");
    }

    #[test]
    fn test_no_quantity() {
        let parsed = parse_line("Salt and pepper, to taste");
        assert_eq!(parsed.quantity, None);
        assert_eq!(parsed.name, "Salt and pepper");
        assert_eq!(parsed.notes.as_deref(), Some("to taste"));
    }

    #[test]
    fn test_blank_and_header_lines() {
        assert!(parse_line("   ").is_empty());
        assert!(parse_line("For the sauce:").is_empty());
        assert_eq!(parse_line("For the sauce:").original_text(), "For the sauce:");
    }

    #[test]
    fn test_malformed_number_becomes_name() {
        let parsed = parse_line("1/0 cup sugar");
        assert_eq!(parsed.quantity, None);
        assert_eq!(parsed.name, "1/0 cup sugar");
    }

    #[test]
    fn test_only_note_falls_back_to_whole_line() {
        let parsed = parse_line("optional");
        assert_eq!(parsed.name, "optional");
        assert!(parsed.notes.is_none());
        assert_eq!(parsed.quantity, None);
    }

    #[test]
    fn test_quantity_only_line_keeps_quantity() {
        let parsed = parse_line("2-3");
        assert_eq!(parsed.quantity, Some(2.0));
        assert_eq!(parsed.quantity_max, Some(3.0));
        assert_eq!(parsed.name, "2-3");

        let parsed = parse_line("1 1/2");
        assert_eq!(parsed.quantity, Some(1.5));
        assert_eq!(parsed.name, "1 1/2");
    }

    #[test]
    fn test_original_text_is_preserved() {
        let parsed = parse_line("  • 3 cloves garlic, minced ");
        assert_eq!(parsed.original_text(), "  • 3 cloves garlic, minced ");
        assert_eq!(parsed.unit.as_deref(), Some("clove"));
        assert_eq!(parsed.name, "garlic");
        assert_eq!(parsed.preparation.as_deref(), Some("minced"));
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  All-Purpose   Flour. "), "all-purpose flour");
        assert_eq!(normalize_name("Eggs"), "eggs");
    }
}
