use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    middleware::{make_span_with_request_id, request_id_middleware, require_auth},
    models::CatalogKind,
    state::AppState,
};

pub mod auth;
pub mod catalog;
pub mod search;
pub mod watchlist;

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes(state.clone()))
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// API routes under /api
fn api_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route(
            "/watchlist/movie/:movie_id",
            post(watchlist::add_movie).delete(watchlist::remove_movie),
        )
        .route("/watchlist/movies", get(watchlist::list_movies))
        .route(
            "/watchlist/show/:show_id",
            post(watchlist::add_show).delete(watchlist::remove_show),
        )
        .route("/watchlist/shows", get(watchlist::list_shows))
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    Router::new()
        .route("/signup", post(auth::signup))
        .route("/signin", post(auth::signin))
        .route("/movies", get(catalog::list_movies))
        .route("/movies/filter", post(catalog::filter_movies))
        .route("/movies/:movie_id", get(catalog::get_movie))
        .route("/shows", get(catalog::list_shows))
        .route("/shows/filter", post(catalog::filter_shows))
        .route("/shows/:show_id", get(catalog::get_show))
        .route("/search", get(search::search))
        .merge(protected)
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Parses a path id, rejecting anything that is not a UUID
fn parse_item_id(kind: CatalogKind, raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw)
        .map_err(|_| AppError::InvalidInput(format!("Invalid {} id: {}", kind, raw)))
}
