//! Pure ordering of the item list.

use std::cmp::Reverse;

use shared::domain::{Item, SortOption};

/// Returns a newly ordered copy of `items`; the input is never touched.
///
/// Names compare case-insensitively, quantities numerically. The sort is
/// stable, so equal keys keep their input order in both directions.
///
/// Case folding is Unicode lowercase with no collation table, so accented
/// letters order by code point: "éclair" sorts after "zebra".
pub fn sort_items(items: &[Item], option: SortOption) -> Vec<Item> {
    let mut sorted = items.to_vec();
    match option {
        SortOption::NameAsc => sorted.sort_by_cached_key(|item| fold_case(&item.name)),
        SortOption::NameDesc => sorted.sort_by_cached_key(|item| Reverse(fold_case(&item.name))),
        SortOption::QuantityAsc => sorted.sort_by_key(|item| item.quantity),
        SortOption::QuantityDesc => sorted.sort_by_key(|item| Reverse(item.quantity)),
    }
    sorted
}

/// Like [`sort_items`] but takes a raw sort key. Unknown keys keep the
/// input order.
pub fn sort_items_by_key(items: &[Item], key: &str) -> Vec<Item> {
    match SortOption::from_key(key) {
        Some(option) => sort_items(items, option),
        None => items.to_vec(),
    }
}

fn fold_case(name: &str) -> String {
    name.to_lowercase()
}

#[cfg(test)]
#[path = "tests/sort_tests.rs"]
mod tests;
