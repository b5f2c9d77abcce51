use reqwest::{header, Client};
use serde_json::{json, Value};
use tracing::{debug, error};

use shared_config::AppConfig;
use shared_models::error::AppError;

const MODEL: &str = "gpt-4";
const MAX_TOKENS: u32 = 1000;

/// Chat-completion client. Pure pass-through: no retry, no fallback; a
/// provider failure surfaces to the caller as-is.
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: config.openai_api_key.clone(),
            base_url: config.openai_base_url.clone(),
        }
    }

    pub async fn chat_completion(
        &self,
        system_prompt: &str,
        message: &str,
        temperature: f64,
    ) -> Result<String, AppError> {
        let url = format!("{}/chat/completions", self.base_url);
        debug!("Requesting chat completion from {}", url);

        let body = json!({
            "model": MODEL,
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": message }
            ],
            "max_tokens": MAX_TOKENS,
            "temperature": temperature
        });

        let response = self
            .client
            .post(&url)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(header::CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unreadable provider error".to_string());
            error!("Completion provider error ({}): {}", status, error_text);
            return Err(AppError::ExternalService(format!(
                "Completion provider error ({}): {}",
                status, error_text
            )));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| AppError::ExternalService(e.to_string()))?;

        let content = payload["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                AppError::ExternalService("Invalid completion response format".to_string())
            })?;

        Ok(content.to_string())
    }
}
