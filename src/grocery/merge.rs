use log::debug;
use uuid::Uuid;

use super::aggregate::{round2, AggregatedGroceryItem};
use super::store::{GroceryItem, ListMutation};
use crate::ingredients::normalize_unit;

fn new_item(item: AggregatedGroceryItem, sort_order: u32) -> GroceryItem {
    GroceryItem {
        id: Uuid::new_v4(),
        name: item.name,
        normalized_name: item.normalized_name,
        quantity: item.quantity,
        unit: item.unit,
        category: item.category,
        is_staple: item.is_staple,
        is_checked: false,
        recipe_ids: item.recipe_ids,
        sort_order,
    }
}

/// Replace mode: the list becomes exactly the aggregated items, in order.
pub fn plan_replace(aggregated: Vec<AggregatedGroceryItem>) -> ListMutation {
    ListMutation::Replace(
        aggregated
            .into_iter()
            .enumerate()
            .map(|(index, item)| new_item(item, index as u32))
            .collect(),
    )
}

/// Merge mode: fold aggregated items into unchecked items with the same key.
///
/// Checked items are never matched, so an incoming item whose only match is
/// checked is inserted as a new line. On a match a missing quantity on either
/// side counts as 0.
pub fn plan_merge(existing: &[GroceryItem], aggregated: Vec<AggregatedGroceryItem>) -> ListMutation {
    let mut updated: Vec<GroceryItem> = Vec::new();
    let mut inserted: Vec<GroceryItem> = Vec::new();
    let mut next_sort = existing
        .iter()
        .map(|item| item.sort_order + 1)
        .max()
        .unwrap_or(0);

    for item in aggregated {
        let key = item.key();
        let matched = existing.iter().find(|candidate| {
            !candidate.is_checked
                && candidate.normalized_name == key.0
                && normalize_unit(candidate.unit.as_deref()) == key.1
        });

        match matched {
            Some(current) => {
                let mut merged = updated
                    .iter()
                    .position(|u| u.id == current.id)
                    .map(|position| updated.remove(position))
                    .unwrap_or_else(|| current.clone());
                merged.quantity = Some(round2(
                    merged.quantity.unwrap_or(0.0) + item.quantity.unwrap_or(0.0),
                ));
                merged.recipe_ids.extend(item.recipe_ids);
                merged.is_staple |= item.is_staple;
                updated.push(merged);
            }
            None => {
                inserted.push(new_item(item, next_sort));
                next_sort += 1;
            }
        }
    }

    debug!("Merge plan: {} updated, {} inserted", updated.len(), inserted.len());
    ListMutation::Apply { updated, inserted }
}
