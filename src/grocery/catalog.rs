//! Master-ingredient identities and a keyword categorizer.

use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{LazyLock, Mutex};
use uuid::Uuid;

use super::store::RecipeIngredient;
use crate::error::GroceryError;
use crate::ingredients::normalize_name;
use crate::model::ImportedIngredient;

/// A deduplicated ingredient identity with a stable category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasterIngredient {
    pub id: Uuid,
    pub name: String,
    pub category: Option<String>,
    pub is_staple: bool,
}

/// Returns or creates the master ingredient for a free-text name.
#[async_trait]
pub trait MasterIngredientLookup: Send + Sync {
    async fn resolve(&self, name: &str) -> Result<MasterIngredient, GroceryError>;
}

/// (keyword, category, staple). Multi-word keywords win over single words, so
/// "bell pepper" is produce while "pepper" is a staple.
const KEYWORDS: &[(&str, &str, bool)] = &[
    // staples
    ("salt", "pantry", true),
    ("pepper", "pantry", true),
    ("black pepper", "pantry", true),
    ("olive oil", "pantry", true),
    ("vegetable oil", "pantry", true),
    ("canola oil", "pantry", true),
    ("oil", "pantry", true),
    ("water", "pantry", true),
    ("cooking spray", "pantry", true),
    // produce
    ("bell pepper", "produce", false),
    ("jalapeno", "produce", false),
    ("jalapeno pepper", "produce", false),
    ("chili pepper", "produce", false),
    ("onion", "produce", false),
    ("shallot", "produce", false),
    ("garlic", "produce", false),
    ("ginger", "produce", false),
    ("tomato", "produce", false),
    ("potato", "produce", false),
    ("sweet potato", "produce", false),
    ("carrot", "produce", false),
    ("celery", "produce", false),
    ("lettuce", "produce", false),
    ("spinach", "produce", false),
    ("kale", "produce", false),
    ("cabbage", "produce", false),
    ("broccoli", "produce", false),
    ("cauliflower", "produce", false),
    ("zucchini", "produce", false),
    ("cucumber", "produce", false),
    ("mushroom", "produce", false),
    ("avocado", "produce", false),
    ("lemon", "produce", false),
    ("lime", "produce", false),
    ("apple", "produce", false),
    ("banana", "produce", false),
    ("berry", "produce", false),
    ("strawberry", "produce", false),
    ("blueberry", "produce", false),
    ("cilantro", "produce", false),
    ("parsley", "produce", false),
    ("basil", "produce", false),
    ("mint", "produce", false),
    ("scallion", "produce", false),
    ("green onion", "produce", false),
    // dairy
    ("milk", "dairy", false),
    ("butter", "dairy", false),
    ("cheese", "dairy", false),
    ("parmesan", "dairy", false),
    ("mozzarella", "dairy", false),
    ("cheddar", "dairy", false),
    ("cream", "dairy", false),
    ("sour cream", "dairy", false),
    ("yogurt", "dairy", false),
    ("egg", "dairy", false),
    // meat
    ("chicken", "meat", false),
    ("beef", "meat", false),
    ("ground beef", "meat", false),
    ("pork", "meat", false),
    ("bacon", "meat", false),
    ("sausage", "meat", false),
    ("ham", "meat", false),
    ("turkey", "meat", false),
    ("lamb", "meat", false),
    ("salmon", "meat", false),
    ("tuna", "meat", false),
    ("shrimp", "meat", false),
    ("fish", "meat", false),
    // bakery
    ("bread", "bakery", false),
    ("baguette", "bakery", false),
    ("bun", "bakery", false),
    ("roll", "bakery", false),
    ("tortilla", "bakery", false),
    ("pita", "bakery", false),
    ("bagel", "bakery", false),
    // frozen
    ("frozen", "frozen", false),
    ("ice cream", "frozen", false),
    // pantry
    ("flour", "pantry", false),
    ("sugar", "pantry", false),
    ("brown sugar", "pantry", false),
    ("baking powder", "pantry", false),
    ("baking soda", "pantry", false),
    ("yeast", "pantry", false),
    ("rice", "pantry", false),
    ("pasta", "pantry", false),
    ("spaghetti", "pantry", false),
    ("noodle", "pantry", false),
    ("oat", "pantry", false),
    ("bean", "pantry", false),
    ("lentil", "pantry", false),
    ("broth", "pantry", false),
    ("chicken broth", "pantry", false),
    ("chicken stock", "pantry", false),
    ("beef broth", "pantry", false),
    ("stock", "pantry", false),
    ("vinegar", "pantry", false),
    ("soy sauce", "pantry", false),
    ("honey", "pantry", false),
    ("vanilla extract", "pantry", false),
    ("cinnamon", "pantry", false),
    ("cumin", "pantry", false),
    ("paprika", "pantry", false),
    ("oregano", "pantry", false),
    ("tomato paste", "pantry", false),
    ("canned tomato", "pantry", false),
    // beverages
    ("wine", "beverages", false),
    ("beer", "beverages", false),
    ("juice", "beverages", false),
    ("coffee", "beverages", false),
    ("tea", "beverages", false),
    ("soda", "beverages", false),
];

/// Keyword table as singular word lists, longest phrase first.
static KEYWORD_PHRASES: LazyLock<Vec<(Vec<String>, &'static str, bool)>> = LazyLock::new(|| {
    let mut phrases: Vec<(Vec<String>, &'static str, bool)> = KEYWORDS
        .iter()
        .map(|(keyword, category, staple)| (singular_words(keyword), *category, *staple))
        .collect();
    phrases.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    phrases
});

fn singular(word: &str) -> String {
    if let Some(stem) = word.strip_suffix("ies") {
        format!("{stem}y")
    } else if let Some(stem) = word.strip_suffix("oes") {
        format!("{stem}o")
    } else if word.len() > 3 && word.ends_with('s') && !word.ends_with("ss") {
        word[..word.len() - 1].to_string()
    } else {
        word.to_string()
    }
}

fn singular_words(text: &str) -> Vec<String> {
    normalize_name(text)
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(singular)
        .collect()
}

/// Category and staple flag for a name by keyword, when any keyword matches.
pub fn categorize(name: &str) -> Option<(&'static str, bool)> {
    let words = singular_words(name);
    KEYWORD_PHRASES
        .iter()
        .find(|(phrase, _, _)| !phrase.is_empty() && words.windows(phrase.len()).any(|w| w == phrase.as_slice()))
        .map(|(_, category, staple)| (*category, *staple))
}

/// In-memory [`MasterIngredientLookup`] that categorizes by keyword and hands
/// out one stable identity per normalized name.
#[derive(Debug, Default)]
pub struct KeywordCatalog {
    known: Mutex<HashMap<String, MasterIngredient>>,
}

impl KeywordCatalog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MasterIngredientLookup for KeywordCatalog {
    async fn resolve(&self, name: &str) -> Result<MasterIngredient, GroceryError> {
        let key = normalize_name(name);
        let mut known = self
            .known
            .lock()
            .map_err(|e| GroceryError::Persistence(format!("Ingredient catalog lock poisoned: {}", e)))?;

        if let Some(existing) = known.get(&key) {
            return Ok(existing.clone());
        }

        let (category, is_staple) = categorize(&key)
            .map(|(category, staple)| (Some(category.to_string()), staple))
            .unwrap_or((None, false));
        let created = MasterIngredient {
            id: Uuid::new_v4(),
            name: key.clone(),
            category,
            is_staple,
        };
        debug!("New master ingredient '{}' ({:?})", created.name, created.category);
        known.insert(key, created.clone());
        Ok(created)
    }
}

/// Attach master-ingredient category and staple flag to imported ingredients,
/// producing the records grocery generation reads.
pub async fn link_ingredients(
    lookup: &dyn MasterIngredientLookup,
    ingredients: &[ImportedIngredient],
) -> Result<Vec<RecipeIngredient>, GroceryError> {
    let mut linked = Vec::with_capacity(ingredients.len());
    for ingredient in ingredients {
        // Headers and blank lines carry no name and are not looked up.
        let (category, is_staple) = if normalize_name(&ingredient.name).is_empty() {
            (None, false)
        } else {
            let master = lookup.resolve(&ingredient.name).await?;
            (master.category, master.is_staple)
        };
        linked.push(RecipeIngredient {
            quantity: ingredient.quantity,
            unit: ingredient.unit.clone(),
            name: ingredient.name.clone(),
            preparation: ingredient.preparation.clone(),
            is_optional: ingredient.is_optional,
            is_staple,
            category,
        });
    }
    Ok(linked)
}
