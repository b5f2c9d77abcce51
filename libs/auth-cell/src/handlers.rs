use std::sync::Arc;

use axum::{
    extract::{Extension, Json, State},
    http::StatusCode,
};
use chrono::Utc;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;

use shared_database::state::AppState;
use shared_models::auth::Principal;
use shared_models::error::AppError;
use shared_models::response::ApiResponse;
use shared_utils::jwt::sign_token;
use shared_utils::password::{hash_password, verify_password};

use crate::models::{DoctorAccount, LoginRequest, RegisterRequest};

async fn find_account_by_email(
    state: &AppState,
    email: &str,
) -> Result<Option<DoctorAccount>, AppError> {
    let path = format!("/rest/v1/users?email=eq.{}", email);
    let mut rows: Vec<DoctorAccount> = state
        .store
        .request(Method::GET, &path, None)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    if rows.is_empty() {
        Ok(None)
    } else {
        Ok(Some(rows.remove(0)))
    }
}

#[axum::debug_handler]
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Value>>), AppError> {
    let (email, password, first_name, last_name) = match (
        request.email.filter(|s| !s.is_empty()),
        request.password.filter(|s| !s.is_empty()),
        request.first_name.filter(|s| !s.is_empty()),
        request.last_name.filter(|s| !s.is_empty()),
    ) {
        (Some(e), Some(p), Some(f), Some(l)) => (e, p, f, l),
        _ => {
            return Err(AppError::ValidationError(
                "Missing required fields: email, password, first_name, last_name".to_string(),
            ))
        }
    };

    debug!("Registering doctor account for {}", email);

    if find_account_by_email(&state, &email).await?.is_some() {
        return Err(AppError::Conflict("Email is already registered".to_string()));
    }

    let password_hash =
        hash_password(&password).map_err(|e| AppError::Internal(e.to_string()))?;

    let now = Utc::now().to_rfc3339();
    let account_row = json!({
        "email": email,
        "password_hash": password_hash,
        "first_name": first_name,
        "last_name": last_name,
        "specialization": request.specialization,
        "license_number": request.license_number,
        "phone": request.phone,
        "role": "doctor",
        "created_at": now,
        "updated_at": now
    });

    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        "Prefer",
        reqwest::header::HeaderValue::from_static("return=representation"),
    );

    let mut created: Vec<DoctorAccount> = state
        .store
        .request_with_headers(
            Method::POST,
            "/rest/v1/users",
            Some(account_row),
            Some(headers.clone()),
        )
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    if created.is_empty() {
        return Err(AppError::Database("Failed to create account".to_string()));
    }
    let account = created.remove(0);

    // Directory profile shares the account id so availability and search
    // routes can key on the authenticated subject directly.
    let profile_row = json!({
        "id": account.id,
        "name": account.full_name(),
        "email": account.email,
        "specialty": account.specialization,
        "is_active": true,
        "created_at": now
    });

    let _: Vec<Value> = state
        .store
        .request_with_headers(
            Method::POST,
            "/rest/v1/doctors",
            Some(profile_row),
            Some(headers),
        )
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            json!({ "user": account.summary() }),
            "Doctor registered successfully",
        )),
    ))
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let (email, password) = match (request.email, request.password) {
        (Some(e), Some(p)) if !e.is_empty() && !p.is_empty() => (e, p),
        _ => {
            return Err(AppError::ValidationError(
                "Email and password are required".to_string(),
            ))
        }
    };

    // Unknown email and wrong password produce the same message, so a caller
    // cannot probe which addresses hold accounts.
    let account = find_account_by_email(&state, &email)
        .await?
        .ok_or_else(|| AppError::Auth("Invalid credentials".to_string()))?;

    let valid = verify_password(&password, &account.password_hash)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    if !valid {
        return Err(AppError::Auth("Invalid credentials".to_string()));
    }

    let principal = Principal {
        id: account.id,
        email: account.email.clone(),
        role: account.role,
    };
    let token = sign_token(&principal, &state.config.jwt_secret, state.config.jwt_expiry_hours);

    debug!("Login successful for {}", account.id);

    Ok(Json(ApiResponse::with_message(
        json!({
            "token": token,
            "user": account.summary()
        }),
        "Login successful",
    )))
}

#[axum::debug_handler]
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let path = format!("/rest/v1/users?id=eq.{}", principal.id);
    let mut rows: Vec<DoctorAccount> = state
        .store
        .request(Method::GET, &path, None)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    if rows.is_empty() {
        return Err(AppError::NotFound("User not found".to_string()));
    }
    let account = rows.remove(0);

    let refreshed = Principal {
        id: account.id,
        email: account.email.clone(),
        role: account.role,
    };
    let token = sign_token(&refreshed, &state.config.jwt_secret, state.config.jwt_expiry_hours);

    Ok(Json(ApiResponse::with_message(
        json!({ "token": token }),
        "Token refreshed",
    )))
}

#[axum::debug_handler]
pub async fn logout(
    Extension(principal): Extension<Principal>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    debug!("Logout for {}", principal.id);

    // Tokens are stateless; the client discards its copy.
    Ok(Json(ApiResponse::with_message(
        Value::Null,
        "Logout successful. Please discard the token client-side.",
    )))
}
