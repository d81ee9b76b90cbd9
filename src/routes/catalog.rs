use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::{CatalogItem, CatalogKind},
    state::AppState,
};

use super::parse_item_id;

/// Filter body. Both fields are optional and a request without a JSON body means no filtering.
#[derive(Debug, Default, Deserialize)]
pub struct FilterRequest {
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub sort_by: Option<String>,
}

/// A missing JSON body is an empty filter. A body that does not parse is rejected.
fn filter_request(body: Result<Json<FilterRequest>, JsonRejection>) -> AppResult<FilterRequest> {
    match body {
        Ok(Json(request)) => Ok(request),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(FilterRequest::default()),
        Err(rejection) => Err(AppError::InvalidInput(rejection.body_text())),
    }
}

async fn list(state: &AppState, kind: CatalogKind) -> AppResult<Json<Vec<CatalogItem>>> {
    Ok(Json(state.catalog.list(kind).await?))
}

async fn filter(
    state: &AppState,
    kind: CatalogKind,
    body: Result<Json<FilterRequest>, JsonRejection>,
) -> AppResult<Json<Vec<CatalogItem>>> {
    let request = filter_request(body)?;
    let items = state
        .catalog
        .filter(kind, request.genre.as_deref(), request.sort_by.as_deref())
        .await?;
    Ok(Json(items))
}

async fn get_one(state: &AppState, kind: CatalogKind, raw_id: &str) -> AppResult<Json<CatalogItem>> {
    let id = parse_item_id(kind, raw_id)?;
    Ok(Json(state.catalog.get(kind, id).await?))
}

pub async fn list_movies(State(state): State<AppState>) -> AppResult<Json<Vec<CatalogItem>>> {
    list(&state, CatalogKind::Movie).await
}

pub async fn list_shows(State(state): State<AppState>) -> AppResult<Json<Vec<CatalogItem>>> {
    list(&state, CatalogKind::Show).await
}

pub async fn filter_movies(
    State(state): State<AppState>,
    body: Result<Json<FilterRequest>, JsonRejection>,
) -> AppResult<Json<Vec<CatalogItem>>> {
    filter(&state, CatalogKind::Movie, body).await
}

pub async fn filter_shows(
    State(state): State<AppState>,
    body: Result<Json<FilterRequest>, JsonRejection>,
) -> AppResult<Json<Vec<CatalogItem>>> {
    filter(&state, CatalogKind::Show, body).await
}

pub async fn get_movie(
    State(state): State<AppState>,
    Path(movie_id): Path<String>,
) -> AppResult<Json<CatalogItem>> {
    get_one(&state, CatalogKind::Movie, &movie_id).await
}

pub async fn get_show(
    State(state): State<AppState>,
    Path(show_id): Path<String>,
) -> AppResult<Json<CatalogItem>> {
    get_one(&state, CatalogKind::Show, &show_id).await
}
