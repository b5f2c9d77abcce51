use chrono::Utc;
use serde_json::{json, Map, Value};
use tracing::debug;
use uuid::Uuid;

use shared_database::scope::SUBSCRIPTIONS;
use shared_database::state::AppState;
use shared_database::store::StoreClient;
use shared_models::auth::Principal;
use shared_models::error::AppError;

use crate::models::{
    CancelSubscriptionRequest, CreateSubscriptionRequest, Subscription, STATUS_ACTIVE,
    STATUS_CANCELLED,
};
use crate::services::PayPalClient;

pub struct BillingService<'a> {
    store: &'a StoreClient,
    paypal: PayPalClient,
    default_return_url: &'a str,
    default_cancel_url: &'a str,
}

impl<'a> BillingService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self {
            store: &state.store,
            paypal: PayPalClient::new(&state.config),
            default_return_url: &state.config.paypal_return_url,
            default_cancel_url: &state.config.paypal_cancel_url,
        }
    }

    /// Creates the provider-side subscription, then mirrors its id locally.
    /// The two writes are not transactional; a failure in between leaves the
    /// provider as the source of truth.
    pub async fn create_subscription(
        &self,
        principal: &Principal,
        request: CreateSubscriptionRequest,
    ) -> Result<Value, AppError> {
        let plan_id = request
            .plan_id
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::ValidationError("plan_id field is required".to_string()))?;

        let return_url = request
            .return_url
            .unwrap_or_else(|| self.default_return_url.to_string());
        let cancel_url = request
            .cancel_url
            .unwrap_or_else(|| self.default_cancel_url.to_string());

        let provider = self
            .paypal
            .create_subscription(&plan_id, &principal.email, &return_url, &cancel_url)
            .await?;

        debug!(
            "Provider subscription {} created for doctor {}",
            provider.id, principal.id
        );

        let now = Utc::now().to_rfc3339();
        let row = json!({
            "doctor_id": principal.id,
            "provider_subscription_id": provider.id,
            "plan_id": plan_id,
            "status": STATUS_ACTIVE,
            "created_at": now,
            "updated_at": now
        });

        let subscription: Subscription = SUBSCRIPTIONS.insert(self.store, row).await?;

        Ok(json!({
            "subscription_id": subscription.id,
            "provider_subscription_id": subscription.provider_subscription_id,
            "plan_id": subscription.plan_id,
            "approval_url": provider.approval_url,
            "status": subscription.status
        }))
    }

    pub async fn list_subscriptions(&self, doctor_id: Uuid) -> Result<Vec<Subscription>, AppError> {
        SUBSCRIPTIONS
            .list(self.store, doctor_id, Some("created_at.desc"))
            .await
    }

    /// Local row first (scoped), then live details from the provider.
    pub async fn get_subscription(
        &self,
        doctor_id: Uuid,
        subscription_id: Uuid,
    ) -> Result<Value, AppError> {
        let subscription: Subscription =
            SUBSCRIPTIONS.get(self.store, doctor_id, subscription_id).await?;

        let provider_details = self
            .paypal
            .get_subscription(&subscription.provider_subscription_id)
            .await?;

        Ok(json!({
            "id": subscription.id,
            "provider_subscription_id": subscription.provider_subscription_id,
            "plan_id": subscription.plan_id,
            "status": provider_details["status"].clone(),
            "created_at": subscription.created_at,
            "provider_details": provider_details
        }))
    }

    /// Provider cancel first, then the local mirror. One-way transition.
    pub async fn cancel_subscription(
        &self,
        doctor_id: Uuid,
        subscription_id: Uuid,
        request: CancelSubscriptionRequest,
    ) -> Result<Subscription, AppError> {
        let subscription: Subscription =
            SUBSCRIPTIONS.get(self.store, doctor_id, subscription_id).await?;

        let reason = request
            .reason
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "User requested cancellation".to_string());

        self.paypal
            .cancel_subscription(&subscription.provider_subscription_id, &reason)
            .await?;

        let mut patch = Map::new();
        patch.insert("status".to_string(), json!(STATUS_CANCELLED));
        patch.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));

        SUBSCRIPTIONS
            .update(self.store, doctor_id, subscription_id, patch)
            .await
    }
}
