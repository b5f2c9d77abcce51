use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use shared_database::state::AppState;
use shared_models::auth::{Principal, Role};
use shared_models::error::AppError;

use crate::jwt::{validate_token, TokenError};

/// Verifies the bearer credential and attaches the decoded principal to the
/// request before any repository access can happen. Missing or expired
/// credentials are unauthenticated; a bad signature is forbidden.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .ok_or_else(|| AppError::Auth("No token provided".to_string()))?;

    let auth_value = auth_header
        .to_str()
        .map_err(|_| AppError::Auth("Invalid authorization header format".to_string()))?;

    if !auth_value.starts_with("Bearer ") {
        return Err(AppError::Auth("Invalid authorization header format".to_string()));
    }

    let token = &auth_value[7..];

    let principal = validate_token(token, &state.config.jwt_secret).map_err(|e| match e {
        TokenError::Expired => AppError::AuthExpired,
        TokenError::Invalid(_) => AppError::Forbidden("Invalid token".to_string()),
    })?;

    request.extensions_mut().insert(principal);

    Ok(next.run(request).await)
}

/// Layered after `auth_middleware` on routes only doctors may use.
pub async fn require_doctor(request: Request<Body>, next: Next) -> Result<Response, AppError> {
    let principal = request
        .extensions()
        .get::<Principal>()
        .cloned()
        .ok_or_else(|| AppError::Auth("No token provided".to_string()))?;

    if principal.role != Role::Doctor {
        return Err(AppError::Forbidden(
            "Access denied: doctors only".to_string(),
        ));
    }

    Ok(next.run(request).await)
}
