use crate::{
    error::{AppError, AppResult},
    models::CatalogItem,
};

/// Trims and lowercases a search term, rejecting empty input
pub fn normalize_term(term: Option<&str>) -> AppResult<String> {
    let term = term.map(str::trim).unwrap_or_default();
    if term.is_empty() {
        return Err(AppError::EmptySearchTerm);
    }
    Ok(term.to_lowercase())
}

fn is_match(item: &CatalogItem, term: &str) -> bool {
    item.title.to_lowercase().contains(term) || item.description.to_lowercase().contains(term)
}

/// Items whose title or description contains `term`, movies first, each list in store order.
///
/// `term` must already be normalized.
pub fn search_items(movies: Vec<CatalogItem>, shows: Vec<CatalogItem>, term: &str) -> Vec<CatalogItem> {
    movies
        .into_iter()
        .chain(shows)
        .filter(|item| is_match(item, term))
        .collect()
}

/// Turns an empty search result into `NotFound`
pub fn require_results(found: Vec<CatalogItem>) -> AppResult<Vec<CatalogItem>> {
    if found.is_empty() {
        return Err(AppError::NotFound("No Movie or Show found".to_string()));
    }
    Ok(found)
}

/// Case-insensitive substring search over titles and descriptions
pub fn search_catalog(
    movies: Vec<CatalogItem>,
    shows: Vec<CatalogItem>,
    term: &str,
) -> AppResult<Vec<CatalogItem>> {
    require_results(search_items(movies, shows, term))
}
