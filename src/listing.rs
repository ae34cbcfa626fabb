//! Listing pipeline: classify items against the current moment, filter by
//! tab, search by title and sort for display.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Item;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Live,
    Upcoming,
    Past,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Newest,
    Popularity,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingQuery {
    /// `None` keeps every category.
    pub category: Option<Category>,
    pub query: String,
    pub sort: SortKey,
}

/// Both ends of the window are inclusive, so `start == end == now` is live.
pub fn classify(item: &Item, now: NaiveDateTime) -> Category {
    if item.start_date <= now && now <= item.end_date {
        Category::Live
    } else if item.start_date > now {
        Category::Upcoming
    } else {
        Category::Past
    }
}

pub fn filter_by_category<'a>(
    items: impl IntoIterator<Item = &'a Item>,
    category: Category,
    now: NaiveDateTime,
) -> Vec<&'a Item> {
    items
        .into_iter()
        .filter(|item| classify(item, now) == category)
        .collect()
}

pub fn matches_query(item: &Item, query: &str) -> bool {
    query.is_empty() || item.title.to_lowercase().contains(&query.to_lowercase())
}

pub fn search<'a>(items: impl IntoIterator<Item = &'a Item>, query: &str) -> Vec<&'a Item> {
    items
        .into_iter()
        .filter(|item| matches_query(item, query))
        .collect()
}

/// Stable: ties keep their incoming order.
pub fn sort_items(items: &mut [&Item], key: SortKey) {
    match key {
        SortKey::Newest => items.sort_by(|a, b| b.start_date.cmp(&a.start_date)),
        SortKey::Popularity => items.sort_by(|a, b| b.popularity().cmp(&a.popularity())),
    }
}

pub fn run<'a>(items: &'a [Item], query: &ListingQuery, now: NaiveDateTime) -> Vec<&'a Item> {
    let mut selected: Vec<&Item> = match query.category {
        Some(category) => filter_by_category(items, category, now),
        None => items.iter().collect(),
    };
    selected.retain(|item| matches_query(item, &query.query));
    sort_items(&mut selected, query.sort);
    selected
}
