use std::sync::Arc;

use serde::Deserialize;

use crate::{
    db::UserStore,
    error::{AppError, AppResult},
    models::{NewUser, User},
    services::auth::TokenService,
};

const MIN_USERNAME_LEN: usize = 4;
const MIN_PASSWORD_LEN: usize = 5;

#[derive(Debug, Clone, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SigninRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

fn required(field: Option<String>) -> AppResult<String> {
    match field {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(AppError::InvalidInput("All fields are required".to_string())),
    }
}

/// Validated signup fields, password still in clear text
struct SignupFields {
    username: String,
    email: String,
    password: String,
}

fn validate_signup(request: SignupRequest) -> AppResult<SignupFields> {
    let username = required(request.username)?;
    let email = required(request.email)?;
    let password = required(request.password)?;

    if username.chars().count() < MIN_USERNAME_LEN {
        return Err(AppError::InvalidInput(
            "Username must be at least 4 characters long".to_string(),
        ));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::InvalidInput(
            "Password must be at least 5 characters long".to_string(),
        ));
    }
    if !email.contains('@') {
        return Err(AppError::InvalidInput("Invalid email format".to_string()));
    }

    Ok(SignupFields {
        username,
        email,
        password,
    })
}

/// Signup and signin
pub struct AccountService {
    users: Arc<dyn UserStore>,
    tokens: Arc<TokenService>,
    bcrypt_cost: u32,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserStore>, tokens: Arc<TokenService>, bcrypt_cost: u32) -> Self {
        Self {
            users,
            tokens,
            bcrypt_cost,
        }
    }

    pub async fn signup(&self, request: SignupRequest) -> AppResult<User> {
        let fields = validate_signup(request)?;

        let cost = self.bcrypt_cost;
        let password = fields.password;
        // bcrypt is CPU bound
        let password_hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| AppError::Internal(format!("Hashing task failed: {}", e)))?
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;

        let user = self
            .users
            .create_user(NewUser {
                username: fields.username,
                email: fields.email,
                password_hash,
            })
            .await?;

        tracing::info!(user_id = %user.id, "Created user");
        Ok(user)
    }

    /// Checks credentials and returns a signed access token
    pub async fn signin(&self, request: SigninRequest) -> AppResult<String> {
        let email = required(request.email)?;
        let password = required(request.password)?;

        let user = self
            .users
            .find_user_by_email(&email)
            .await?
            .ok_or(AppError::UserNotFound)?;

        let hash = user.password_hash.clone();
        let valid = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| AppError::Internal(format!("Verification task failed: {}", e)))?
            .map_err(|e| AppError::Internal(format!("Failed to verify password: {}", e)))?;

        if !valid {
            tracing::debug!(user_id = %user.id, "Rejected signin");
            return Err(AppError::Unauthorized("Invalid Credentials".to_string()));
        }

        self.tokens.issue(user.id)
    }
}
