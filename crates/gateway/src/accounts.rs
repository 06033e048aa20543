//! `POST /signup` and `POST /login`.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use ecowatt_core::error::StoreError;
use ecowatt_core::record::NewUser;
use ecowatt_security::{check_password_policy, hash_password, normalize_email, verify_password};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::SharedState;
use crate::error::ApiError;

const DUPLICATE_EMAIL: &str = "User already exists with this email";
const BAD_CREDENTIALS: &str = "Invalid email or password";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignupRequest {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub tn_electricity_id: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SignupUser {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginUser {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub age: Option<u32>,
    pub phone: Option<String>,
    pub tn_electricity_id: Option<String>,
    pub energy_points: f64,
}

#[derive(Debug, Serialize)]
pub struct AccountResponse<U> {
    pub message: &'static str,
    pub user: U,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub async fn signup_handler(
    State(state): State<SharedState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AccountResponse<SignupUser>>), ApiError> {
    let Json(req) = payload?;

    let (Some(name), Some(email), Some(password)) = (
        non_blank(req.name),
        non_blank(req.email),
        req.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(ApiError::bad_request("Name, email, and password are required"));
    };
    check_password_policy(&password).map_err(ApiError::BadRequest)?;

    let email = normalize_email(&email);
    let existing = state
        .store
        .find_user_by_email(&email)
        .await
        .map_err(|e| ApiError::store("Error registering user", e))?;
    if existing.is_some() {
        return Err(ApiError::bad_request(DUPLICATE_EMAIL));
    }

    // Argon2 blocks; run it on the blocking pool.
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| ApiError::internal("Error registering user", e))?
        .map_err(|e| ApiError::internal("Error registering user", e))?;

    let user = state
        .store
        .create_user(NewUser {
            name: name.trim().to_string(),
            age: req.age,
            email,
            phone: non_blank(req.phone),
            tn_electricity_id: non_blank(req.tn_electricity_id),
            password_hash,
        })
        .await
        .map_err(|e| match e {
            StoreError::Conflict(_) => ApiError::bad_request(DUPLICATE_EMAIL),
            other => ApiError::store("Error registering user", other),
        })?;

    info!(user_id = %user.id, "User registered");
    Ok((
        StatusCode::CREATED,
        Json(AccountResponse {
            message: "User registered successfully",
            user: SignupUser {
                id: user.id,
                name: user.name,
                email: user.email,
            },
        }),
    ))
}

pub async fn login_handler(
    State(state): State<SharedState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AccountResponse<LoginUser>>, ApiError> {
    let Json(req) = payload?;
    let (Some(email), Some(password)) = (non_blank(req.email), req.password) else {
        return Err(ApiError::bad_request(BAD_CREDENTIALS));
    };

    let Some(user) = state
        .store
        .find_user_by_email(&normalize_email(&email))
        .await
        .map_err(|e| ApiError::store("Error logging in", e))?
    else {
        return Err(ApiError::bad_request(BAD_CREDENTIALS));
    };

    let hash = user.password_hash.clone();
    let matches = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| ApiError::internal("Error logging in", e))?
        .map_err(|e| ApiError::internal("Error logging in", e))?;
    if !matches {
        warn!(user_id = %user.id, "Login failed: wrong password");
        return Err(ApiError::bad_request(BAD_CREDENTIALS));
    }

    info!(user_id = %user.id, "User logged in");
    Ok(Json(AccountResponse {
        message: "Login successful",
        user: LoginUser {
            id: user.id,
            name: user.name,
            email: user.email,
            age: user.age,
            phone: user.phone,
            tn_electricity_id: user.tn_electricity_id,
            energy_points: user.energy_points,
        },
    }))
}
