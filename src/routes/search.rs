use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::{error::AppResult, models::CatalogItem, state::AppState};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(rename = "searchTerm", default)]
    search_term: Option<String>,
}

/// Handler for the movie and show search endpoint
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<Vec<CatalogItem>>> {
    let found = state.catalog.search(params.search_term.as_deref()).await?;
    Ok(Json(found))
}
