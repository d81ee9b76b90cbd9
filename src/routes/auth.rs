use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::{
    error::AppResult,
    models::UserProfile,
    services::{SigninRequest, SignupRequest},
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub message: &'static str,
    pub user: UserProfile,
}

#[derive(Debug, Serialize)]
pub struct SigninResponse {
    pub token: String,
}

pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> AppResult<(StatusCode, Json<SignupResponse>)> {
    let user = state.accounts.signup(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: "User created successfully",
            user: UserProfile::from(&user),
        }),
    ))
}

pub async fn signin(
    State(state): State<AppState>,
    Json(request): Json<SigninRequest>,
) -> AppResult<Json<SigninResponse>> {
    let token = state.accounts.signin(request).await?;
    Ok(Json(SigninResponse { token }))
}
