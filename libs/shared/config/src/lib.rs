use std::env;
use tracing::warn;

/// Application configuration, loaded once at startup from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store_url: String,
    pub store_service_key: String,
    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub paypal_client_id: String,
    pub paypal_client_secret: String,
    pub paypal_base_url: String,
    pub paypal_return_url: String,
    pub paypal_cancel_url: String,
    pub email_api_url: String,
    pub email_api_key: String,
    pub email_from: String,
    pub cors_origins: Vec<String>,
    pub port: u16,
}

fn env_or_warn(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| {
        warn!("{} not set, using empty value", key);
        String::new()
    })
}

fn env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            store_url: env_or_warn("STORE_URL"),
            store_service_key: env_or_warn("STORE_SERVICE_KEY"),
            jwt_secret: env_or_warn("JWT_SECRET"),
            jwt_expiry_hours: env_or_default("JWT_EXPIRE_HOURS", "168")
                .parse()
                .unwrap_or(168),
            openai_api_key: env_or_warn("OPENAI_API_KEY"),
            openai_base_url: env_or_default("OPENAI_BASE_URL", "https://api.openai.com/v1"),
            paypal_client_id: env_or_warn("PAYPAL_CLIENT_ID"),
            paypal_client_secret: env_or_warn("PAYPAL_CLIENT_SECRET"),
            paypal_base_url: env_or_default("PAYPAL_BASE_URL", "https://api.sandbox.paypal.com"),
            paypal_return_url: env_or_warn("PAYPAL_RETURN_URL"),
            paypal_cancel_url: env_or_warn("PAYPAL_CANCEL_URL"),
            email_api_url: env_or_warn("EMAIL_API_URL"),
            email_api_key: env_or_warn("EMAIL_API_KEY"),
            email_from: env_or_default("EMAIL_FROM", "no-reply@practia.health"),
            cors_origins: env_or_default("CORS_ORIGIN", "http://localhost:3000")
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            port: env_or_default("PORT", "5000").parse().unwrap_or(5000),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.store_url.is_empty()
            && !self.store_service_key.is_empty()
            && !self.jwt_secret.is_empty()
    }

    pub fn is_billing_configured(&self) -> bool {
        !self.paypal_client_id.is_empty()
            && !self.paypal_client_secret.is_empty()
            && !self.paypal_base_url.is_empty()
    }

    pub fn is_email_configured(&self) -> bool {
        !self.email_api_url.is_empty() && !self.email_api_key.is_empty()
    }
}
