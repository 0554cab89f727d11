//! Normalizers shared by the structured-markup extractors.

use html_escape::decode_html_entities;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::sync::LazyLock;

static DURATION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    let part = r"(\d+(?:\.\d+)?)(?:-\d+(?:\.\d+)?)?";
    Regex::new(&format!(
        r"(?i)^P(?:{part}D)?(?:T(?:{part}H)?(?:{part}M)?(?:{part}S)?)?$"
    ))
    .expect("Invalid duration regex")
});

static YIELD_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<before>^[^\d]*)(?P<num>\d+(?:[.,]\d+)?)(?:\s*(?:-|–|to)\s*\d+(?:[.,]\d+)?)?\s*(?P<after>.*)$")
        .expect("Invalid yield regex")
});

static TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("Invalid tag regex"));

/// `recipeYield` as it appears in untrusted markup.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub(crate) enum RecipeYield {
    Number(f64),
    Text(String),
    List(Vec<RecipeYield>),
    Quantity(QuantitativeValue),
}

/// schema.org `QuantitativeValue`, e.g. `{"value": 4, "unitText": "servings"}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct QuantitativeValue {
    value: Option<Box<RecipeYield>>,
    #[serde(rename = "unitText")]
    unit_text: Option<String>,
}

/// A yield reduced to a number and an optional unit ("4", "servings").
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct YieldAmount {
    pub quantity: f64,
    pub unit: Option<String>,
}

impl RecipeYield {
    pub fn normalize(&self) -> Option<YieldAmount> {
        match self {
            RecipeYield::Number(n) => normalize_number_yield(*n),
            RecipeYield::Text(text) => normalize_text_yield(text),
            RecipeYield::List(items) => normalize_list_yield(items),
            RecipeYield::Quantity(q) => {
                let mut amount = q.value.as_ref()?.normalize()?;
                if let Some(unit) = q.unit_text.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
                    amount.unit = Some(unit.to_string());
                }
                Some(amount)
            }
        }
    }
}

/// A duration field: ISO-8601 text, or a bare number of minutes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub(crate) enum DurationValue {
    Minutes(f64),
    Text(String),
}

impl DurationValue {
    pub fn minutes(&self) -> Option<u32> {
        match self {
            DurationValue::Minutes(m) if m.is_finite() && *m >= 0.0 => Some(m.round() as u32),
            DurationValue::Minutes(_) => None,
            DurationValue::Text(text) => parse_duration_minutes(text),
        }
    }
}

/// Reads an optional field, treating a value of the wrong shape as absent.
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn normalize_number_yield(n: f64) -> Option<YieldAmount> {
    (n.is_finite() && n > 0.0).then_some(YieldAmount {
        quantity: n,
        unit: None,
    })
}

fn normalize_text_yield(text: &str) -> Option<YieldAmount> {
    let text = clean_text(text);
    let caps = YIELD_REGEX.captures(&text)?;
    let quantity: f64 = caps.name("num")?.as_str().replace(',', ".").parse().ok()?;
    if quantity <= 0.0 {
        return None;
    }

    let before = caps.name("before").map(|m| m.as_str().trim().to_lowercase());
    let after = caps
        .name("after")
        .map(|m| m.as_str().trim().trim_end_matches('.').to_string())
        .filter(|s| !s.is_empty());

    let unit = after.or_else(|| {
        before
            .filter(|b| b.starts_with("serv"))
            .map(|_| "servings".to_string())
    });

    Some(YieldAmount { quantity, unit })
}

// Lists often repeat the yield as a bare number and as a descriptive string;
// prefer the one that carries a unit.
fn normalize_list_yield(items: &[RecipeYield]) -> Option<YieldAmount> {
    let amounts: Vec<YieldAmount> = items.iter().filter_map(RecipeYield::normalize).collect();
    amounts
        .iter()
        .find(|a| a.unit.is_some())
        .or_else(|| amounts.first())
        .cloned()
}

/// Minutes in an ISO-8601 duration such as `PT1H30M` or `PT5400.0S`. Ranges
/// use their lower bound; a bare number is taken as minutes.
pub(crate) fn parse_duration_minutes(duration: &str) -> Option<u32> {
    let duration = duration.trim();
    if duration.is_empty() {
        return None;
    }
    if let Ok(minutes) = duration.parse::<f64>() {
        return (minutes.is_finite() && minutes >= 0.0).then(|| minutes.round() as u32);
    }

    let caps = DURATION_REGEX.captures(duration)?;
    let part = |index: usize| -> Option<f64> { caps.get(index)?.as_str().parse().ok() };
    let (days, hours, minutes, seconds) = (part(1), part(2), part(3), part(4));
    if days.is_none() && hours.is_none() && minutes.is_none() && seconds.is_none() {
        return None;
    }

    let total_seconds = days.unwrap_or(0.0) * 86_400.0
        + hours.unwrap_or(0.0) * 3_600.0
        + minutes.unwrap_or(0.0) * 60.0
        + seconds.unwrap_or(0.0);
    Some((total_seconds / 60.0).round() as u32)
}

/// When only one of prep and cook time is given, derive the other from the
/// total.
pub(crate) fn fill_from_total(
    prep: Option<u32>,
    cook: Option<u32>,
    total: Option<u32>,
) -> (Option<u32>, Option<u32>) {
    match (prep, cook, total) {
        (Some(prep), None, Some(total)) if total > prep => (Some(prep), Some(total - prep)),
        (None, Some(cook), Some(total)) if total > cook => (Some(total - cook), Some(cook)),
        _ => (prep, cook),
    }
}

/// Decode entities (some sites double-encode), drop inline tags and collapse
/// whitespace.
pub(crate) fn clean_text(text: &str) -> String {
    let decoded = decode_html_entities(&decode_html_entities(text)).into_owned();
    let stripped = TAG_REGEX.replace_all(&decoded, " ");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split a comma separated keyword string, dropping blanks and
/// case-insensitive duplicates already in `tags`.
pub(crate) fn push_tags(tags: &mut Vec<String>, value: &str) {
    for tag in value.split(',').map(clean_text) {
        if tag.is_empty() {
            continue;
        }
        if !tags.iter().any(|t| t.eq_ignore_ascii_case(&tag)) {
            tags.push(tag);
        }
    }
}

/// Site name used when the markup names no publisher.
pub fn site_name(url: &str) -> Option<String> {
    let parsed = reqwest::Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    Some(host.trim_start_matches("www.").to_string())
}
