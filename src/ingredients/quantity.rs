use regex::Regex;
use std::sync::LazyLock;

/// Unicode vulgar fractions and their exact values.
const VULGAR_FRACTIONS: &[(char, f64)] = &[
    ('½', 0.5),
    ('⅓', 1.0 / 3.0),
    ('⅔', 2.0 / 3.0),
    ('¼', 0.25),
    ('¾', 0.75),
    ('⅕', 0.2),
    ('⅖', 0.4),
    ('⅗', 0.6),
    ('⅘', 0.8),
    ('⅙', 1.0 / 6.0),
    ('⅚', 5.0 / 6.0),
    ('⅐', 1.0 / 7.0),
    ('⅛', 0.125),
    ('⅜', 0.375),
    ('⅝', 0.625),
    ('⅞', 0.875),
    ('⅑', 1.0 / 9.0),
    ('⅒', 0.1),
];

const NUMBER_WORDS: &[(&str, f64)] = &[
    ("one", 1.0),
    ("two", 2.0),
    ("three", 3.0),
    ("four", 4.0),
    ("five", 5.0),
    ("six", 6.0),
    ("seven", 7.0),
    ("eight", 8.0),
    ("nine", 9.0),
    ("ten", 10.0),
    ("eleven", 11.0),
    ("twelve", 12.0),
    ("an", 1.0),
    ("a", 1.0),
];

const FRACTION_CLASS: &str = "[½⅓⅔¼¾⅕⅖⅗⅘⅙⅚⅐⅛⅜⅝⅞⅑⅒]";

// Alternation order matters: mixed numbers before plain fractions, fractions
// before bare integers.
static NUMBER_PATTERN: LazyLock<String> = LazyLock::new(|| {
    format!(
        r"\d+\s*{frac}|\d+\s+\d+/\d+|\d+/\d+|\d+(?:\.\d+)?|\.\d+|{frac}",
        frac = FRACTION_CLASS
    )
});

const WORD_PATTERN: &str = "one|two|three|four|five|six|seven|eight|nine|ten|eleven|twelve";

static RANGE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    let num = format!("{}|{}", NUMBER_PATTERN.as_str(), WORD_PATTERN);
    Regex::new(&format!(
        r"(?i)^(?P<lo>{num})\s*(?:[-–—]|\bto\b)\s*(?P<hi>{num})"
    ))
    .expect("Invalid quantity range regex")
});

static NUMBER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^(?:{})", NUMBER_PATTERN.as_str())).expect("Invalid quantity regex")
});

static WORD_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)^(?:{WORD_PATTERN}|an|a)\b")).expect("Invalid number word regex")
});

/// A quantity found at the start of an ingredient line.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LeadingQuantity {
    pub value: f64,
    pub max: Option<f64>,
    /// Byte length of the consumed prefix.
    pub consumed: usize,
}

/// Extract a leading quantity (number, fraction, mixed number, number word
/// or range). Malformed tokens yield `None` and leave the text untouched.
pub(crate) fn extract_quantity(text: &str) -> Option<LeadingQuantity> {
    if let Some(caps) = RANGE_REGEX.captures(text) {
        let lo = caps.name("lo").and_then(|m| number_value(m.as_str()));
        let hi = caps.name("hi").and_then(|m| number_value(m.as_str()));
        if let (Some(lo), Some(hi)) = (lo, hi) {
            let end = caps.get(0).map(|m| m.end()).unwrap_or(0);
            return Some(LeadingQuantity {
                value: lo,
                max: Some(hi),
                consumed: end,
            });
        }
    }

    if let Some(m) = NUMBER_REGEX.find(text) {
        return number_value(m.as_str()).map(|value| LeadingQuantity {
            value,
            max: None,
            consumed: m.end(),
        });
    }

    if let Some(m) = WORD_REGEX.find(text) {
        // "a"/"an" only count when followed by another word
        let rest = &text[m.end()..];
        if rest.starts_with(char::is_whitespace) {
            return number_value(m.as_str()).map(|value| LeadingQuantity {
                value,
                max: None,
                consumed: m.end(),
            });
        }
    }

    None
}

/// Value of a single numeric token. Returns `None` for malformed input such
/// as a zero denominator.
pub(crate) fn number_value(token: &str) -> Option<f64> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }

    if let Some(word) = NUMBER_WORDS
        .iter()
        .find(|(word, _)| word.eq_ignore_ascii_case(token))
    {
        return Some(word.1);
    }

    if let Some(frac_pos) = token.find(|c: char| vulgar_value(c).is_some()) {
        let whole = token[..frac_pos].trim();
        let frac = token[frac_pos..].chars().next().and_then(vulgar_value)?;
        let whole = if whole.is_empty() {
            0.0
        } else {
            whole.parse::<f64>().ok()?
        };
        return Some(whole + frac);
    }

    if token.contains('/') {
        let (whole, fraction) = match token.split_once(char::is_whitespace) {
            Some((whole, fraction)) => (whole.parse::<f64>().ok()?, fraction.trim()),
            None => (0.0, token),
        };
        let (num, den) = fraction.split_once('/')?;
        let num: f64 = num.trim().parse().ok()?;
        let den: f64 = den.trim().parse().ok()?;
        if den == 0.0 {
            return None;
        }
        return Some(whole + num / den);
    }

    token.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn vulgar_value(c: char) -> Option<f64> {
    VULGAR_FRACTIONS
        .iter()
        .find(|(frac, _)| *frac == c)
        .map(|(_, value)| *value)
}
