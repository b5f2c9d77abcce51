use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;
use tracing::debug;

use shared_models::auth::{JwtClaims, Principal};

type HmacSha256 = Hmac<Sha256>;

/// Expired credentials are kept distinct from invalid ones: the caller maps
/// them to different rejections (401 vs 403).
#[derive(Debug, Error, PartialEq)]
pub enum TokenError {
    #[error("Token expired")]
    Expired,

    #[error("{0}")]
    Invalid(String),
}

pub fn sign_token(principal: &Principal, secret: &str, expiry_hours: i64) -> String {
    let now = Utc::now();
    let exp = now + Duration::hours(expiry_hours);

    let header = serde_json::json!({
        "alg": "HS256",
        "typ": "JWT"
    });

    let payload = serde_json::json!({
        "sub": principal.id,
        "email": principal.email,
        "role": principal.role,
        "iat": now.timestamp(),
        "exp": exp.timestamp()
    });

    let header_encoded = URL_SAFE_NO_PAD.encode(header.to_string());
    let payload_encoded = URL_SAFE_NO_PAD.encode(payload.to_string());
    let signing_input = format!("{}.{}", header_encoded, payload_encoded);

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(signing_input.as_bytes());
    let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

    format!("{}.{}", signing_input, signature)
}

pub fn validate_token(token: &str, secret: &str) -> Result<Principal, TokenError> {
    if secret.is_empty() {
        return Err(TokenError::Invalid("JWT secret is not set".to_string()));
    }

    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err(TokenError::Invalid("Invalid token format".to_string()));
    }

    let header_b64 = parts[0];
    let claims_b64 = parts[1];
    let signature_b64 = parts[2];

    let signature = URL_SAFE_NO_PAD.decode(signature_b64).map_err(|e| {
        debug!("Failed to decode signature: {}", e);
        TokenError::Invalid("Invalid signature encoding".to_string())
    })?;

    let signing_input = format!("{}.{}", header_b64, claims_b64);

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(signing_input.as_bytes());

    if mac.verify_slice(&signature).is_err() {
        debug!("Token signature verification failed");
        return Err(TokenError::Invalid("Invalid token signature".to_string()));
    }

    let claims_json = URL_SAFE_NO_PAD
        .decode(claims_b64)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .ok_or_else(|| TokenError::Invalid("Invalid claims encoding".to_string()))?;

    let claims: JwtClaims = serde_json::from_str(&claims_json).map_err(|e| {
        debug!("Failed to parse claims: {}", e);
        TokenError::Invalid("Invalid claims format".to_string())
    })?;

    let now = Utc::now().timestamp();
    if claims.exp < now {
        debug!("Token expired at {} (now: {})", claims.exp, now);
        return Err(TokenError::Expired);
    }

    let principal = Principal {
        id: claims.sub,
        email: claims.email,
        role: claims.role,
    };

    debug!("Token validated successfully for user: {}", principal.id);
    Ok(principal)
}
