use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, error};

use shared_config::AppConfig;
use shared_models::error::AppError;

/// Billing-provider client. Each operation is a single pass-through call;
/// there is no retry or reconciliation on top.
pub struct PayPalClient {
    client: Client,
    client_id: String,
    client_secret: String,
    base_url: String,
}

#[derive(Debug)]
pub struct ProviderSubscription {
    pub id: String,
    pub approval_url: Option<String>,
}

impl PayPalClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            client_id: config.paypal_client_id.clone(),
            client_secret: config.paypal_client_secret.clone(),
            base_url: config.paypal_base_url.clone(),
        }
    }

    async fn get_access_token(&self) -> Result<String, AppError> {
        let url = format!("{}/v1/oauth2/token", self.base_url);
        debug!("Requesting provider access token");

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body("grant_type=client_credentials")
            .send()
            .await
            .map_err(|e| AppError::ExternalService(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            error!("Provider token error ({}): {}", status, text);
            return Err(AppError::ExternalService(format!(
                "Provider token error ({}): {}",
                status, text
            )));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| AppError::ExternalService(e.to_string()))?;

        payload["access_token"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| AppError::ExternalService("Provider returned no access token".to_string()))
    }

    pub async fn create_subscription(
        &self,
        plan_id: &str,
        subscriber_email: &str,
        return_url: &str,
        cancel_url: &str,
    ) -> Result<ProviderSubscription, AppError> {
        let access_token = self.get_access_token().await?;
        let url = format!("{}/v1/billing/subscriptions", self.base_url);

        let body = json!({
            "plan_id": plan_id,
            "subscriber": {
                "email_address": subscriber_email
            },
            "application_context": {
                "brand_name": "Practia",
                "user_action": "SUBSCRIBE_NOW",
                "return_url": return_url,
                "cancel_url": cancel_url
            }
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&access_token)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            error!("Provider subscription error ({}): {}", status, text);
            return Err(AppError::ExternalService(format!(
                "Provider subscription error ({}): {}",
                status, text
            )));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| AppError::ExternalService(e.to_string()))?;

        let id = payload["id"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| {
                AppError::ExternalService("Provider returned no subscription id".to_string())
            })?;

        let approval_url = payload["links"]
            .as_array()
            .and_then(|links| {
                links
                    .iter()
                    .find(|link| link["rel"].as_str() == Some("approve"))
            })
            .and_then(|link| link["href"].as_str())
            .map(|s| s.to_string());

        Ok(ProviderSubscription { id, approval_url })
    }

    pub async fn get_subscription(&self, provider_subscription_id: &str) -> Result<Value, AppError> {
        let access_token = self.get_access_token().await?;
        let url = format!(
            "{}/v1/billing/subscriptions/{}",
            self.base_url, provider_subscription_id
        );

        let response = self
            .client
            .get(&url)
            .bearer_auth(&access_token)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "Provider lookup error ({}): {}",
                status, text
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::ExternalService(e.to_string()))
    }

    pub async fn cancel_subscription(
        &self,
        provider_subscription_id: &str,
        reason: &str,
    ) -> Result<(), AppError> {
        let access_token = self.get_access_token().await?;
        let url = format!(
            "{}/v1/billing/subscriptions/{}/cancel",
            self.base_url, provider_subscription_id
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&access_token)
            .header("Content-Type", "application/json")
            .json(&json!({ "reason": reason }))
            .send()
            .await
            .map_err(|e| AppError::ExternalService(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            error!("Provider cancel error ({}): {}", status, text);
            return Err(AppError::ExternalService(format!(
                "Provider cancel error ({}): {}",
                status, text
            )));
        }

        Ok(())
    }
}
