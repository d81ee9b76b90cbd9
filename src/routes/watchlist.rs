use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Serialize;

use crate::{
    error::AppResult,
    middleware::AuthUser,
    models::{CatalogItem, CatalogKind, Watchlist},
    state::AppState,
};

use super::parse_item_id;

/// Response to add and remove: the stored id list after the change
#[derive(Debug, Serialize)]
pub struct WatchlistUpdated {
    pub message: String,
    pub watchlist: Watchlist,
}

/// Response to list: the watchlist resolved to catalog items
#[derive(Debug, Serialize)]
pub struct WatchlistItems {
    pub message: String,
    pub watchlist: Vec<CatalogItem>,
}

async fn add(
    state: &AppState,
    AuthUser(user_id): AuthUser,
    kind: CatalogKind,
    raw_id: &str,
) -> AppResult<Json<WatchlistUpdated>> {
    let item_id = parse_item_id(kind, raw_id)?;
    let watchlist = state.watchlists.add(user_id, kind, item_id).await?;
    Ok(Json(WatchlistUpdated {
        message: format!("{} added to watchlist", kind.label()),
        watchlist,
    }))
}

async fn remove(
    state: &AppState,
    AuthUser(user_id): AuthUser,
    kind: CatalogKind,
    raw_id: &str,
) -> AppResult<Json<WatchlistUpdated>> {
    let item_id = parse_item_id(kind, raw_id)?;
    let watchlist = state.watchlists.remove(user_id, kind, item_id).await?;
    Ok(Json(WatchlistUpdated {
        message: format!("{} successfully removed from watchlist", kind.label()),
        watchlist,
    }))
}

async fn list(
    state: &AppState,
    AuthUser(user_id): AuthUser,
    kind: CatalogKind,
) -> AppResult<Json<WatchlistItems>> {
    let watchlist = state.watchlists.list(user_id, kind).await?;
    Ok(Json(WatchlistItems {
        message: format!("Fetched {} watchlist successfully", kind),
        watchlist,
    }))
}

pub async fn add_movie(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(movie_id): Path<String>,
) -> AppResult<Json<WatchlistUpdated>> {
    add(&state, user, CatalogKind::Movie, &movie_id).await
}

pub async fn remove_movie(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(movie_id): Path<String>,
) -> AppResult<Json<WatchlistUpdated>> {
    remove(&state, user, CatalogKind::Movie, &movie_id).await
}

pub async fn list_movies(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> AppResult<Json<WatchlistItems>> {
    list(&state, user, CatalogKind::Movie).await
}

pub async fn add_show(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(show_id): Path<String>,
) -> AppResult<Json<WatchlistUpdated>> {
    add(&state, user, CatalogKind::Show, &show_id).await
}

pub async fn remove_show(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(show_id): Path<String>,
) -> AppResult<Json<WatchlistUpdated>> {
    remove(&state, user, CatalogKind::Show, &show_id).await
}

pub async fn list_shows(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> AppResult<Json<WatchlistItems>> {
    list(&state, user, CatalogKind::Show).await
}
