use serde::{Deserialize, Serialize};

use super::store::GroceryItem;

/// Store-aisle display order. Unknown categories follow, staples come last.
pub const CATEGORY_ORDER: &[&str] = &[
    "produce",
    "dairy",
    "meat",
    "bakery",
    "frozen",
    "pantry",
    "beverages",
];

pub const STAPLES_CATEGORY: &str = "staples";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryGroup {
    pub category: String,
    pub items: Vec<GroceryItem>,
}

/// Bucket items for display. Staple items always go to the staples bucket;
/// empty buckets are omitted.
pub fn group_items_by_category(items: &[GroceryItem]) -> Vec<CategoryGroup> {
    let mut known: Vec<Vec<GroceryItem>> = vec![Vec::new(); CATEGORY_ORDER.len()];
    let mut unknown: Vec<CategoryGroup> = Vec::new();
    let mut staples: Vec<GroceryItem> = Vec::new();

    for item in items {
        let category = item.category.trim().to_lowercase();
        if item.is_staple || category == STAPLES_CATEGORY {
            staples.push(item.clone());
            continue;
        }
        match CATEGORY_ORDER.iter().position(|c| *c == category) {
            Some(position) => known[position].push(item.clone()),
            None => match unknown.iter_mut().find(|group| group.category == category) {
                Some(group) => group.items.push(item.clone()),
                None => unknown.push(CategoryGroup {
                    category,
                    items: vec![item.clone()],
                }),
            },
        }
    }

    unknown.sort_by(|a, b| a.category.cmp(&b.category));

    let mut groups: Vec<CategoryGroup> = CATEGORY_ORDER
        .iter()
        .zip(known)
        .map(|(category, items)| CategoryGroup {
            category: category.to_string(),
            items,
        })
        .chain(unknown)
        .chain(std::iter::once(CategoryGroup {
            category: STAPLES_CATEGORY.to_string(),
            items: staples,
        }))
        .filter(|group| !group.items.is_empty())
        .collect();

    for group in &mut groups {
        group
            .items
            .sort_by_cached_key(|item| (item.name.to_lowercase(), item.name.clone()));
    }
    groups
}
