use super::schema::{
    clean_text, fill_from_total, lenient, push_tags, site_name, DurationValue, RecipeYield,
};
use super::{selector, Extractor, ParsingContext};
use crate::ingredients::parse_line;
use crate::model::{number_steps, ImportedIngredient, ImportedRecipe};
use log::debug;
use serde::de::IgnoredAny;
use serde::Deserialize;
use serde_json::Value;
use std::error::Error;

pub struct JsonLdExtractor;

impl JsonLdExtractor {
    fn convert_to_recipe(&self, json_ld_recipe: JsonLdRecipe, url: &str) -> ImportedRecipe {
        let title = clean_text(json_ld_recipe.name.as_deref().unwrap_or_default());

        let description = json_ld_recipe
            .description
            .map(|desc| match desc {
                DescriptionType::String(d) => clean_text(&d),
                DescriptionType::Object(d) => clean_text(&d.text),
            })
            .filter(|d| !d.is_empty());

        // One ingredient per list entry, headers and blanks included.
        let ingredients = match json_ld_recipe.recipe_ingredient {
            Some(RecipeIngredients::List(entries)) => entries
                .into_iter()
                .filter_map(IngredientEntry::into_line)
                .map(|line| ImportedIngredient::from(parse_line(&line)))
                .collect(),
            Some(RecipeIngredients::Single(text)) => text
                .lines()
                .map(clean_text)
                .filter(|line| !line.is_empty())
                .map(|line| ImportedIngredient::from(parse_line(&line)))
                .collect(),
            None => Vec::new(),
        };

        let mut steps = Vec::new();
        match json_ld_recipe.recipe_instructions {
            Some(RecipeInstructions::Text(text)) => {
                // Paragraph breaks are the only structure a plain string has
                let text = text.replace("<br>", "\n").replace("<br/>", "\n");
                for line in text.lines() {
                    steps.push((None, clean_text(line)));
                }
            }
            Some(RecipeInstructions::List(items)) => flatten_instructions(items, None, &mut steps),
            Some(RecipeInstructions::Node(node)) => {
                flatten_instructions(vec![InstructionItem::Node(node)], None, &mut steps)
            }
            None => {}
        }
        let instructions = number_steps(steps);

        let yield_amount = json_ld_recipe.recipe_yield.and_then(|y| y.normalize());

        let (prep_minutes, cook_minutes) = fill_from_total(
            json_ld_recipe.prep_time.as_ref().and_then(DurationValue::minutes),
            json_ld_recipe.cook_time.as_ref().and_then(DurationValue::minutes),
            json_ld_recipe.total_time.as_ref().and_then(DurationValue::minutes),
        );

        let mut tags = Vec::new();
        for field in [
            json_ld_recipe.keywords,
            json_ld_recipe.recipe_category,
            json_ld_recipe.recipe_cuisine,
        ]
        .into_iter()
        .flatten()
        {
            match field {
                StringOrList::String(s) => push_tags(&mut tags, &s),
                StringOrList::List(values) => {
                    for value in values {
                        push_tags(&mut tags, &value);
                    }
                }
            }
        }

        let author = json_ld_recipe.author.and_then(Author::into_name);
        let source_name = json_ld_recipe
            .publisher
            .and_then(Author::into_name)
            .or_else(|| site_name(url));

        let cover_image_url = json_ld_recipe.image.and_then(|img| match img {
            ImageType::String(i) => Some(clean_text(&i)),
            ImageType::MultipleStrings(imgs) => imgs.first().map(|i| clean_text(i)),
            ImageType::Object(i) => i.url,
            ImageType::MultipleObjects(imgs) => imgs.into_iter().find_map(|i| i.url),
            ImageType::None => None,
        });

        ImportedRecipe {
            title,
            description,
            ingredients,
            instructions,
            yield_quantity: yield_amount.as_ref().map(|y| y.quantity),
            yield_unit: yield_amount.and_then(|y| y.unit),
            prep_minutes,
            cook_minutes,
            difficulty: None,
            source_url: Some(url.to_string()),
            source_name,
            author,
            cover_image_url: cover_image_url.filter(|u| !u.is_empty()),
            tags,
            video_start_seconds: None,
        }
    }
}

/// Walk HowToStep / HowToSection / nested lists in document order.
fn flatten_instructions(
    items: Vec<InstructionItem>,
    section: Option<String>,
    steps: &mut Vec<(Option<String>, String)>,
) {
    for item in items {
        match item {
            InstructionItem::Text(text) => steps.push((section.clone(), clean_text(&text))),
            InstructionItem::Nested(nested) => flatten_instructions(nested, section.clone(), steps),
            InstructionItem::Node(node) => {
                if let Some(children) = node.item_list_element {
                    let name = node.name.map(|n| clean_text(&n)).filter(|n| !n.is_empty());
                    flatten_instructions(children, name.or_else(|| section.clone()), steps);
                } else if let Some(text) = node.text.or(node.name).or(node.description) {
                    steps.push((section.clone(), clean_text(&text)));
                }
            }
        }
    }
}

/// Every field is optional and read leniently: a field of an unexpected
/// shape is treated as absent instead of rejecting the record.
#[derive(Debug, Deserialize)]
struct JsonLdRecipe {
    #[serde(default, deserialize_with = "lenient")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    description: Option<DescriptionType>,
    #[serde(default, deserialize_with = "lenient")]
    image: Option<ImageType>,
    #[serde(rename = "recipeIngredient", alias = "ingredients", default, deserialize_with = "lenient")]
    recipe_ingredient: Option<RecipeIngredients>,
    #[serde(rename = "recipeInstructions", default, deserialize_with = "lenient")]
    recipe_instructions: Option<RecipeInstructions>,
    #[serde(rename = "recipeYield", default, deserialize_with = "lenient")]
    recipe_yield: Option<RecipeYield>,
    #[serde(rename = "prepTime", default, deserialize_with = "lenient")]
    prep_time: Option<DurationValue>,
    #[serde(rename = "cookTime", default, deserialize_with = "lenient")]
    cook_time: Option<DurationValue>,
    #[serde(rename = "totalTime", default, deserialize_with = "lenient")]
    total_time: Option<DurationValue>,
    #[serde(rename = "recipeCategory", default, deserialize_with = "lenient")]
    recipe_category: Option<StringOrList>,
    #[serde(rename = "recipeCuisine", default, deserialize_with = "lenient")]
    recipe_cuisine: Option<StringOrList>,
    #[serde(default, deserialize_with = "lenient")]
    keywords: Option<StringOrList>,
    #[serde(default, deserialize_with = "lenient")]
    author: Option<Author>,
    #[serde(default, deserialize_with = "lenient")]
    publisher: Option<Author>,
}

#[derive(Debug, Deserialize)]
struct ImageObject {
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TextObject {
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DescriptionType {
    String(String),
    Object(TextObject),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ImageType {
    None,
    String(String),
    Object(ImageObject),
    MultipleStrings(Vec<String>),
    MultipleObjects(Vec<ImageObject>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecipeIngredients {
    List(Vec<IngredientEntry>),
    Single(String),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum IngredientEntry {
    Text(String),
    Object(IngredientObject),
    Other(IgnoredAny),
}

impl IngredientEntry {
    /// The raw line for a text or `{name, amount}` entry; `None` for nulls and
    /// other shapes.
    fn into_line(self) -> Option<String> {
        match self {
            IngredientEntry::Text(line) => Some(clean_text(&line)),
            IngredientEntry::Object(ing) => {
                let amount = ing.amount.as_deref().unwrap_or("").trim().to_string();
                let name = clean_text(&ing.name);
                Some(if amount.is_empty() {
                    name
                } else {
                    format!("{amount} {name}")
                })
            }
            IngredientEntry::Other(_) => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct IngredientObject {
    name: String,
    amount: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecipeInstructions {
    Text(String),
    List(Vec<InstructionItem>),
    Node(InstructionNode),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InstructionItem {
    Text(String),
    Node(InstructionNode),
    Nested(Vec<InstructionItem>),
}

/// HowToStep, HowToSection or ItemList; told apart by `itemListElement`.
#[derive(Debug, Deserialize)]
struct InstructionNode {
    name: Option<String>,
    text: Option<String>,
    description: Option<String>,
    #[serde(rename = "itemListElement")]
    item_list_element: Option<Vec<InstructionItem>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StringOrList {
    String(String),
    List(Vec<String>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Author {
    String(String),
    Object(AuthorObject),
    Multiple(Vec<AuthorObject>),
}

impl Author {
    fn into_name(self) -> Option<String> {
        let name = match self {
            Author::String(name) => Some(name),
            Author::Object(obj) => obj.name,
            Author::Multiple(authors) => {
                let names: Vec<String> = authors.into_iter().filter_map(|a| a.name).collect();
                (!names.is_empty()).then(|| names.join(", "))
            }
        };
        name.map(|n| clean_text(&n)).filter(|n| !n.is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct AuthorObject {
    name: Option<String>,
}

fn is_recipe_type(value: &Value) -> bool {
    match value.get("@type") {
        Some(Value::String(t)) => t.eq_ignore_ascii_case("recipe"),
        Some(Value::Array(types)) => types
            .iter()
            .filter_map(Value::as_str)
            .any(|t| t.eq_ignore_ascii_case("recipe")),
        _ => false,
    }
}

/// Find the Recipe node in a root object, a top-level array, `@graph` or
/// `mainEntity`.
fn find_recipe(value: &Value) -> Option<&Value> {
    match value {
        Value::Array(items) => items.iter().find_map(find_recipe),
        Value::Object(_) if is_recipe_type(value) => Some(value),
        Value::Object(map) => map
            .get("@graph")
            .and_then(find_recipe)
            .or_else(|| map.get("mainEntity").and_then(find_recipe)),
        _ => None,
    }
}

impl Extractor for JsonLdExtractor {
    fn name(&self) -> &str {
        "json_ld"
    }

    fn parse(&self, context: &ParsingContext) -> Result<ImportedRecipe, Box<dyn Error + Send + Sync>> {
        debug!("JsonLdExtractor: Starting parse for URL: {}", context.url);
        let selector = selector("script[type='application/ld+json']")?;

        let scripts: Vec<_> = context.document.select(&selector).collect();
        debug!("JsonLdExtractor: Found {} JSON-LD script tags", scripts.len());

        // Try each script element until we find a valid recipe
        for (index, script) in scripts.iter().enumerate() {
            let raw_json = script.inner_html();
            let cleaned_json = sanitize_json(&raw_json);

            let json_ld = match serde_json::from_str::<Value>(&cleaned_json) {
                Ok(json_ld) => json_ld,
                Err(e) => {
                    debug!("JsonLdExtractor: Failed to parse JSON-LD {}: {}", index, e);
                    continue;
                }
            };

            let Some(recipe_json) = find_recipe(&json_ld) else {
                debug!("JsonLdExtractor: No recipe found in JSON-LD {}", index);
                continue;
            };

            match serde_json::from_value::<JsonLdRecipe>(recipe_json.clone()) {
                Ok(recipe) if recipe.name.as_deref().is_some_and(|n| !n.trim().is_empty()) => {
                    debug!("JsonLdExtractor: Successfully converted JSON-LD {}", index);
                    return Ok(self.convert_to_recipe(recipe, &context.url));
                }
                Ok(_) => debug!("JsonLdExtractor: Recipe in JSON-LD {} has no name", index),
                Err(e) => debug!("JsonLdExtractor: Failed to convert JSON-LD {}: {}", index, e),
            }
        }

        Err("No valid recipe found in any JSON-LD script".into())
    }
}

/// Drop stray commas that some CMSes leave before closing brackets, and the
/// raw control characters they leave inside strings.
fn sanitize_json(json_str: &str) -> String {
    let mut cleaned = String::with_capacity(json_str.len());
    let mut in_string = false;
    let mut escaped = false;
    let chars: Vec<char> = json_str.trim().chars().collect();

    for (i, &c) in chars.iter().enumerate() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                '\n' | '\r' | '\t' => {
                    cleaned.push(' ');
                    continue;
                }
                _ => {}
            }
            cleaned.push(c);
            continue;
        }

        match c {
            '"' => in_string = true,
            ',' => {
                let next = chars[i + 1..].iter().find(|c| !c.is_whitespace());
                if matches!(next, Some(']') | Some('}') | Some(',')) {
                    continue;
                }
            }
            _ => {}
        }
        cleaned.push(c);
    }

    cleaned
}
