use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use uuid::Uuid;

use super::store::RecipeSummary;
use crate::ingredients::{normalize_name, normalize_unit};

/// One shopping line summed across every planned recipe that needs it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedGroceryItem {
    /// Display name, cased as first seen.
    pub name: String,
    pub normalized_name: String,
    /// `None` when no contributing ingredient had a quantity.
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub category: String,
    pub is_staple: bool,
    pub recipe_ids: BTreeSet<Uuid>,
}

impl AggregatedGroceryItem {
    pub fn key(&self) -> (String, String) {
        (self.normalized_name.clone(), normalize_unit(self.unit.as_deref()))
    }
}

/// Planned servings over recipe yield. Anything that cannot give a positive
/// finite factor scales by 1.
pub fn scale_factor(servings: Option<f64>, yield_quantity: Option<f64>) -> f64 {
    match (servings, yield_quantity) {
        (Some(servings), Some(yield_quantity)) if yield_quantity > 0.0 => {
            let factor = servings / yield_quantity;
            if factor.is_finite() && factor > 0.0 {
                factor
            } else {
                1.0
            }
        }
        _ => 1.0,
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Scale, filter and group recipe ingredients by normalized name and unit.
/// Groups keep first-seen order.
pub fn aggregate_ingredients(
    planned: &[(RecipeSummary, f64)],
    default_category: &str,
) -> Vec<AggregatedGroceryItem> {
    let mut items: Vec<AggregatedGroceryItem> = Vec::new();
    let mut index: HashMap<(String, String), usize> = HashMap::new();

    for (recipe, scale) in planned {
        for ingredient in recipe.ingredients.iter().filter(|i| !i.is_optional) {
            let normalized_name = normalize_name(&ingredient.name);
            if normalized_name.is_empty() {
                continue;
            }
            let key = (normalized_name, normalize_unit(ingredient.unit.as_deref()));
            let scaled = ingredient.quantity.map(|q| q * scale);

            match index.get(&key) {
                Some(&position) => {
                    let item = &mut items[position];
                    if let Some(scaled) = scaled {
                        item.quantity = Some(item.quantity.unwrap_or(0.0) + scaled);
                    }
                    item.is_staple |= ingredient.is_staple;
                    item.recipe_ids.insert(recipe.id);
                }
                None => {
                    index.insert(key.clone(), items.len());
                    items.push(AggregatedGroceryItem {
                        name: ingredient.name.split_whitespace().collect::<Vec<_>>().join(" "),
                        normalized_name: key.0,
                        quantity: scaled,
                        unit: display_unit(ingredient.unit.as_deref()),
                        category: ingredient
                            .category
                            .clone()
                            .filter(|c| !c.trim().is_empty())
                            .unwrap_or_else(|| default_category.to_string()),
                        is_staple: ingredient.is_staple,
                        recipe_ids: BTreeSet::from([recipe.id]),
                    });
                }
            }
        }
    }

    for item in &mut items {
        item.quantity = item.quantity.map(round2);
    }
    items
}

fn display_unit(unit: Option<&str>) -> Option<String> {
    Some(normalize_unit(unit)).filter(|u| !u.is_empty())
}
