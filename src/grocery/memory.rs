use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use super::store::{GroceryListSnapshot, GroceryStore, ListMutation, MealPlanEntry, RecipeSummary};
use super::DateRange;
use crate::error::GroceryError;

#[derive(Debug, Default)]
struct MemoryState {
    entries: Vec<(Uuid, MealPlanEntry)>,
    recipes: HashMap<Uuid, RecipeSummary>,
    lists: HashMap<Uuid, GroceryListSnapshot>,
}

/// A [`GroceryStore`] held in process memory. Commits are versioned per list
/// and applied under one lock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, GroceryError> {
        self.state
            .lock()
            .map_err(|e| GroceryError::Persistence(format!("Store lock poisoned: {}", e)))
    }

    pub fn insert_recipe(&self, recipe: RecipeSummary) -> Result<(), GroceryError> {
        self.lock()?.recipes.insert(recipe.id, recipe);
        Ok(())
    }

    pub fn insert_meal_plan_entry(&self, user_id: Uuid, entry: MealPlanEntry) -> Result<(), GroceryError> {
        self.lock()?.entries.push((user_id, entry));
        Ok(())
    }
}

#[async_trait]
impl GroceryStore for MemoryStore {
    async fn meal_plan_entries(
        &self,
        user_id: Uuid,
        range: &DateRange,
    ) -> Result<Vec<MealPlanEntry>, GroceryError> {
        let state = self.lock()?;
        let mut entries: Vec<MealPlanEntry> = state
            .entries
            .iter()
            .filter(|(owner, entry)| *owner == user_id && range.contains(entry.date))
            .map(|(_, entry)| entry.clone())
            .collect();
        entries.sort_by_key(|entry| entry.date);
        Ok(entries)
    }

    async fn recipe(&self, recipe_id: Uuid) -> Result<Option<RecipeSummary>, GroceryError> {
        Ok(self.lock()?.recipes.get(&recipe_id).cloned())
    }

    async fn grocery_list(&self, user_id: Uuid) -> Result<GroceryListSnapshot, GroceryError> {
        let mut state = self.lock()?;
        let list = state.lists.entry(user_id).or_insert_with(|| GroceryListSnapshot {
            list_id: Uuid::new_v4(),
            user_id,
            version: 0,
            items: Vec::new(),
        });
        Ok(list.clone())
    }

    async fn commit(
        &self,
        list_id: Uuid,
        expected_version: u64,
        mutation: ListMutation,
    ) -> Result<GroceryListSnapshot, GroceryError> {
        let mut state = self.lock()?;
        let list = state
            .lists
            .values_mut()
            .find(|list| list.list_id == list_id)
            .ok_or_else(|| GroceryError::Persistence(format!("Unknown grocery list {}", list_id)))?;

        if list.version != expected_version {
            return Err(GroceryError::Conflict { list_id });
        }

        match mutation {
            ListMutation::Replace(items) => list.items = items,
            ListMutation::Apply { updated, inserted } => {
                // All or nothing: check every id before applying
                if let Some(missing) = updated
                    .iter()
                    .find(|item| !list.items.iter().any(|existing| existing.id == item.id))
                {
                    return Err(GroceryError::Persistence(format!(
                        "Unknown grocery item {}",
                        missing.id
                    )));
                }
                for item in updated {
                    if let Some(existing) = list.items.iter_mut().find(|existing| existing.id == item.id) {
                        *existing = item;
                    }
                }
                list.items.extend(inserted);
            }
        }
        list.version += 1;
        Ok(list.clone())
    }
}
