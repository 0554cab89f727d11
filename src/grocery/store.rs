//! Records exchanged with the persistence collaborator.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

use super::DateRange;
use crate::error::GroceryError;

/// One planned meal. Custom entries have no `recipe_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealPlanEntry {
    pub id: Uuid,
    pub date: NaiveDate,
    pub recipe_id: Option<Uuid>,
    pub servings: Option<f64>,
}

/// A persisted ingredient of a recipe, already linked to its master
/// ingredient's category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub name: String,
    pub preparation: Option<String>,
    pub is_optional: bool,
    pub is_staple: bool,
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeSummary {
    pub id: Uuid,
    pub title: String,
    pub yield_quantity: Option<f64>,
    pub ingredients: Vec<RecipeIngredient>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroceryItem {
    pub id: Uuid,
    pub name: String,
    pub normalized_name: String,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub category: String,
    pub is_staple: bool,
    pub is_checked: bool,
    pub recipe_ids: BTreeSet<Uuid>,
    pub sort_order: u32,
}

/// A grocery list as read at one version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroceryListSnapshot {
    pub list_id: Uuid,
    pub user_id: Uuid,
    pub version: u64,
    pub items: Vec<GroceryItem>,
}

/// The change one generation makes to a list, applied atomically.
#[derive(Debug, Clone, PartialEq)]
pub enum ListMutation {
    /// Delete every existing item, then insert these.
    Replace(Vec<GroceryItem>),
    /// Overwrite matched items by id and append new ones.
    Apply {
        updated: Vec<GroceryItem>,
        inserted: Vec<GroceryItem>,
    },
}

/// Persistence collaborator for grocery generation.
///
/// `commit` must apply the whole mutation or nothing, and must reject it with
/// [`GroceryError::Conflict`] when the list is no longer at
/// `expected_version`.
#[async_trait]
pub trait GroceryStore: Send + Sync {
    async fn meal_plan_entries(
        &self,
        user_id: Uuid,
        range: &DateRange,
    ) -> Result<Vec<MealPlanEntry>, GroceryError>;

    async fn recipe(&self, recipe_id: Uuid) -> Result<Option<RecipeSummary>, GroceryError>;

    /// The user's grocery list, created empty when missing.
    async fn grocery_list(&self, user_id: Uuid) -> Result<GroceryListSnapshot, GroceryError>;

    async fn commit(
        &self,
        list_id: Uuid,
        expected_version: u64,
        mutation: ListMutation,
    ) -> Result<GroceryListSnapshot, GroceryError>;
}
