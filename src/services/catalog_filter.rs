use std::cmp::Ordering;

use crate::{
    error::{AppError, AppResult},
    models::{CatalogItem, CatalogKind},
    services::genre_index,
};

/// Orderings supported by the filter endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Newest first
    ReleaseDate,
    /// Most votes first
    Rating,
    /// By title, A to Z, ignoring case
    Alphabetical,
}

impl SortKey {
    /// Parses a client-supplied key. Unknown keys yield `None`, meaning no reordering.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "release_date" => Some(SortKey::ReleaseDate),
            "rating" => Some(SortKey::Rating),
            "alphabetical" => Some(SortKey::Alphabetical),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::ReleaseDate => "release_date",
            SortKey::Rating => "rating",
            SortKey::Alphabetical => "alphabetical",
        }
    }

    fn compare(&self, a: &CatalogItem, b: &CatalogItem) -> Ordering {
        match self {
            SortKey::ReleaseDate => b.release_date.cmp(&a.release_date),
            SortKey::Rating => b.popularity.cmp(&a.popularity),
            SortKey::Alphabetical => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        }
    }
}

/// Keeps the items tagged with `genre_id` (all items when `None`), then applies `sort`.
///
/// The sort is stable, so items with equal keys keep their store order.
pub fn filter_items(
    mut items: Vec<CatalogItem>,
    genre_id: Option<u32>,
    sort: Option<SortKey>,
) -> Vec<CatalogItem> {
    if let Some(genre_id) = genre_id {
        items.retain(|item| item.genre.contains(genre_id));
    }
    if let Some(sort) = sort {
        items.sort_by(|a, b| sort.compare(a, b));
    }
    items
}

/// Turns an empty filter result into `NotFound`
pub fn require_matches(kind: CatalogKind, items: Vec<CatalogItem>) -> AppResult<Vec<CatalogItem>> {
    if items.is_empty() {
        return Err(AppError::NotFound(format!(
            "No {} of such genre is available at the moment",
            kind
        )));
    }
    Ok(items)
}

/// Filters items by genre name, failing with `InvalidGenre` for unknown names
/// and `NotFound` when nothing matches.
pub fn filter_catalog(
    kind: CatalogKind,
    items: Vec<CatalogItem>,
    genre: Option<&str>,
    sort: Option<SortKey>,
) -> AppResult<Vec<CatalogItem>> {
    let genre_id = genre.map(genre_index::genre_id).transpose()?;
    require_matches(kind, filter_items(items, genre_id, sort))
}
