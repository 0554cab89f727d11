use regex::Regex;
use std::sync::LazyLock;

static TRAILING_NOTE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:^|[\s,;(]+)\(?\s*(to taste|optional|for garnish|for serving|as needed|divided)\s*\)?\s*\.?\s*$",
    )
    .expect("Invalid trailing note regex")
});

static TRAILING_PAREN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<name>.*?)\s*\((?P<inner>[^()]*)\)\s*$").expect("Invalid parenthetical regex")
});

static SIZE_TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\(?\s*\d+(?:\.\d+)?\s*-?\s*(?:oz|ounces?|g|ml|lbs?)\.?\s*\)?(?:\s+|$)")
        .expect("Invalid size token regex")
});

const PREPARATION_KEYWORDS: &[&str] = &[
    "chopped",
    "diced",
    "minced",
    "sliced",
    "grated",
    "shredded",
    "peeled",
    "crushed",
    "melted",
    "softened",
    "beaten",
    "cubed",
    "julienned",
    "halved",
    "quartered",
    "drained",
    "rinsed",
    "trimmed",
    "seeded",
    "cored",
    "toasted",
    "sifted",
    "mashed",
    "torn",
    "zested",
    "juiced",
    "pitted",
    "deveined",
    "stemmed",
    "squeezed",
    "thawed",
    "cooked",
    "cooled",
    "separated",
    "whisked",
    "packed",
    "cut",
    "finely",
    "thinly",
    "roughly",
    "coarsely",
];

const PREPARATION_PHRASES: &[&str] = &["room temperature", "at room temp"];

/// Strip every stacked trailing clause ("to taste", "optional", ...). Notes are
/// returned in reading order.
pub(crate) fn strip_trailing_notes(text: &str) -> (&str, Vec<String>) {
    let mut rest = text.trim_end();
    let mut notes = Vec::new();

    while let Some(caps) = TRAILING_NOTE_REGEX.captures(rest) {
        let (Some(whole), Some(note)) = (caps.get(0), caps.get(1)) else {
            break;
        };
        notes.push(note.as_str().to_lowercase());
        rest = rest[..whole.start()].trim_end();
        if rest.is_empty() {
            break;
        }
    }

    notes.reverse();
    (rest, notes)
}

/// Result of splitting the remaining text into name and preparation.
#[derive(Debug, Default, PartialEq)]
pub(crate) struct NameSplit {
    pub name: String,
    pub preparation: Option<String>,
    pub note: Option<String>,
}

/// Comma form: the text after the first comma is preparation only when it
/// carries a preparation keyword; otherwise the whole text stays the name.
/// Without a comma a trailing parenthetical becomes preparation or a note.
pub(crate) fn split_name_preparation(text: &str) -> NameSplit {
    let text = text.trim();

    if let Some((before, after)) = text.split_once(',') {
        let after = after.trim();
        if has_preparation_keyword(after) {
            return NameSplit {
                name: before.trim().to_string(),
                preparation: Some(after.to_string()),
                note: None,
            };
        }
        return NameSplit {
            name: text.to_string(),
            ..Default::default()
        };
    }

    if let Some(caps) = TRAILING_PAREN_REGEX.captures(text) {
        let name = caps.name("name").map(|m| m.as_str().trim()).unwrap_or("");
        let inner = caps.name("inner").map(|m| m.as_str().trim()).unwrap_or("");
        if !name.is_empty() && !inner.is_empty() {
            let (preparation, note) = if has_preparation_keyword(inner) {
                (Some(inner.to_string()), None)
            } else {
                (None, Some(inner.to_string()))
            };
            return NameSplit {
                name: name.to_string(),
                preparation,
                note,
            };
        }
    }

    NameSplit {
        name: text.to_string(),
        ..Default::default()
    }
}

/// A package size like "14oz" or "(14 oz)" right after the quantity. Returns the
/// token and the text after it.
pub(crate) fn take_size_token(text: &str) -> Option<(&str, &str)> {
    let m = SIZE_TOKEN_REGEX.find(text)?;
    Some((m.as_str().trim(), &text[m.end()..]))
}

fn has_preparation_keyword(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower
        .split(|c: char| !c.is_alphabetic())
        .any(|word| PREPARATION_KEYWORDS.contains(&word))
        || PREPARATION_PHRASES.iter().any(|phrase| lower.contains(phrase))
}

pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
