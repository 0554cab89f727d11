//! Grocery list generation from planned meals.

mod aggregate;
mod catalog;
mod categories;
mod memory;
mod merge;
mod store;

pub use aggregate::{aggregate_ingredients, scale_factor, AggregatedGroceryItem};
pub use catalog::{categorize, link_ingredients, KeywordCatalog, MasterIngredient, MasterIngredientLookup};
pub use categories::{group_items_by_category, CategoryGroup, CATEGORY_ORDER, STAPLES_CATEGORY};
pub use memory::MemoryStore;
pub use merge::{plan_merge, plan_replace};
pub use store::{
    GroceryItem, GroceryListSnapshot, GroceryStore, ListMutation, MealPlanEntry, RecipeIngredient,
    RecipeSummary,
};

use chrono::NaiveDate;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::config::GroceryConfig;
use crate::error::GroceryError;

/// Inclusive range of plan dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, GroceryError> {
        if start > end {
            return Err(GroceryError::InvalidRange(format!(
                "start {} is after end {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Rebuild (`merge = false`) or extend (`merge = true`) the user's grocery
/// list from the recipes planned in `range`.
///
/// Every read happens before the single commit, so a persistence failure or
/// a [`GroceryError::Conflict`] leaves the list as it was. On conflict the
/// caller retries the whole call.
pub async fn generate(
    store: &dyn GroceryStore,
    user_id: Uuid,
    range: &DateRange,
    merge: bool,
    config: &GroceryConfig,
) -> Result<GroceryListSnapshot, GroceryError> {
    let entries = store.meal_plan_entries(user_id, range).await?;

    let mut recipes: HashMap<Uuid, Option<RecipeSummary>> = HashMap::new();
    let mut planned: Vec<(RecipeSummary, f64)> = Vec::new();
    for entry in entries.iter().filter(|entry| range.contains(entry.date)) {
        let Some(recipe_id) = entry.recipe_id else {
            continue;
        };
        if !recipes.contains_key(&recipe_id) {
            let recipe = store.recipe(recipe_id).await?;
            recipes.insert(recipe_id, recipe);
        }
        match recipes.get(&recipe_id).and_then(Option::as_ref) {
            Some(recipe) => {
                let scale = scale_factor(entry.servings, recipe.yield_quantity);
                planned.push((recipe.clone(), scale));
            }
            None => warn!("Meal plan entry {} links missing recipe {}", entry.id, recipe_id),
        }
    }

    let aggregated = aggregate_ingredients(&planned, &config.default_category);
    debug!(
        "Aggregated {} planned recipe(s) into {} item(s)",
        planned.len(),
        aggregated.len()
    );

    let list = store.grocery_list(user_id).await?;
    let mutation = if merge {
        plan_merge(&list.items, aggregated)
    } else {
        plan_replace(aggregated)
    };

    match store.commit(list.list_id, list.version, mutation).await {
        Ok(updated) => {
            info!(
                "Grocery list {} now at version {} with {} item(s)",
                updated.list_id,
                updated.version,
                updated.items.len()
            );
            Ok(updated)
        }
        Err(e) => {
            warn!("Grocery list {} commit failed: {}", list.list_id, e);
            Err(e)
        }
    }
}
