use std::sync::LazyLock;

/// Canonical unit followed by every spelling that normalizes to it.
const UNIT_SYNONYMS: &[(&str, &[&str])] = &[
    (
        "teaspoon",
        &["teaspoon", "teaspoons", "tsp", "tsps", "tspn"],
    ),
    (
        "tablespoon",
        &["tablespoon", "tablespoons", "tbsp", "tbsps", "tbs", "tbl", "tblsp"],
    ),
    ("cup", &["cup", "cups"]),
    (
        "fluid ounce",
        &["fluid ounce", "fluid ounces", "fl oz", "fl. oz", "fl.oz"],
    ),
    ("ounce", &["ounce", "ounces", "oz"]),
    ("pound", &["pound", "pounds", "lb", "lbs"]),
    ("gram", &["gram", "grams", "gramme", "grammes", "g", "gr"]),
    ("kilogram", &["kilogram", "kilograms", "kilo", "kilos", "kg", "kgs"]),
    (
        "milliliter",
        &["milliliter", "milliliters", "millilitre", "millilitres", "ml"],
    ),
    ("liter", &["liter", "liters", "litre", "litres", "l"]),
    ("pint", &["pint", "pints", "pt", "pts"]),
    ("quart", &["quart", "quarts", "qt", "qts"]),
    ("gallon", &["gallon", "gallons", "gal"]),
    ("pinch", &["pinch", "pinches"]),
    ("dash", &["dash", "dashes"]),
    ("drop", &["drop", "drops"]),
    ("clove", &["clove", "cloves"]),
    ("can", &["can", "cans", "tin", "tins"]),
    ("jar", &["jar", "jars"]),
    ("bottle", &["bottle", "bottles"]),
    ("package", &["package", "packages", "pkg", "pkgs", "packet", "packets"]),
    ("bag", &["bag", "bags"]),
    ("box", &["box", "boxes"]),
    ("stick", &["stick", "sticks"]),
    ("slice", &["slice", "slices"]),
    ("piece", &["piece", "pieces"]),
    ("bunch", &["bunch", "bunches"]),
    ("head", &["head", "heads"]),
    ("sprig", &["sprig", "sprigs"]),
    ("stalk", &["stalk", "stalks"]),
    ("handful", &["handful", "handfuls"]),
];

/// Every known spelling paired with its canonical unit, longest first so a
/// short abbreviation never shadows a longer word.
static UNIT_SPELLINGS: LazyLock<Vec<(&'static str, &'static str)>> = LazyLock::new(|| {
    let mut spellings: Vec<(&'static str, &'static str)> = UNIT_SYNONYMS
        .iter()
        .flat_map(|(canonical, variants)| variants.iter().map(move |v| (*v, *canonical)))
        .collect();
    spellings.sort_by(|a, b| b.0.chars().count().cmp(&a.0.chars().count()));
    spellings
});

/// Canonical unit for an exact spelling, ignoring case and a trailing period.
pub fn canonical_unit(text: &str) -> Option<&'static str> {
    let text = text.trim().trim_end_matches('.');
    UNIT_SPELLINGS
        .iter()
        .find(|(spelling, _)| spelling.eq_ignore_ascii_case(text))
        .map(|(_, canonical)| *canonical)
}

/// Unit component of a grocery dedup key. Known spellings collapse to their
/// canonical unit, anything else is lowercased; no unit is the empty string.
pub fn normalize_unit(unit: Option<&str>) -> String {
    match unit.map(str::trim).filter(|u| !u.is_empty()) {
        Some(unit) => canonical_unit(unit)
            .map(str::to_string)
            .unwrap_or_else(|| unit.to_lowercase()),
        None => String::new(),
    }
}

/// Match a unit anchored at the start of `text`. The spelling must be followed
/// by whitespace or the end of the text (an abbreviation may carry a period).
/// Returns the canonical unit and the remaining text.
pub(crate) fn extract_unit(text: &str) -> Option<(&'static str, &str)> {
    UNIT_SPELLINGS.iter().find_map(|(spelling, canonical)| {
        let head = text.get(..spelling.len())?;
        if !head.eq_ignore_ascii_case(spelling) {
            return None;
        }
        let mut rest = &text[spelling.len()..];
        if let Some(stripped) = rest.strip_prefix('.') {
            rest = stripped;
        }
        if rest.is_empty() || rest.starts_with(char::is_whitespace) {
            Some((*canonical, rest.trim_start()))
        } else {
            None
        }
    })
}
