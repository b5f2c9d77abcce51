use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Method;
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use shared_database::state::AppState;
use shared_database::store::StoreClient;
use shared_models::auth::{Principal, Role};
use shared_models::error::AppError;

use crate::models::Notification;

const INBOX_LIMIT: u64 = 20;

/// The recipient filter a caller's inbox queries are scoped by: rows
/// addressed to them, plus general broadcasts.
pub fn recipient_filter(principal: &Principal) -> String {
    let column = match principal.role {
        Role::Patient => "patient_id",
        Role::Doctor | Role::Admin => "doctor_id",
    };
    format!("or=({}.eq.{},is_general.is.true)", column, principal.id)
}

pub struct NotificationService<'a> {
    store: &'a StoreClient,
}

impl<'a> NotificationService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { store: &state.store }
    }

    pub async fn list_inbox(&self, principal: &Principal) -> Result<Vec<Notification>, AppError> {
        let path = format!(
            "/rest/v1/notifications?{}&order=created_at.desc&limit={}",
            recipient_filter(principal),
            INBOX_LIMIT
        );

        debug!("Inbox fetch for {}", principal.id);

        self.store
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Marks read; the write statement carries the recipient filter, so a
    /// foreign notification reads as not-found.
    pub async fn mark_read(
        &self,
        principal: &Principal,
        notification_id: Uuid,
    ) -> Result<Notification, AppError> {
        let path = format!(
            "/rest/v1/notifications?id=eq.{}&{}",
            notification_id,
            recipient_filter(principal)
        );

        let patch = json!({
            "is_read": true,
            "read_at": Utc::now().to_rfc3339()
        });

        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));

        let mut rows: Vec<Notification> = self
            .store
            .request_with_headers(Method::PATCH, &path, Some(patch), Some(headers))
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if rows.is_empty() {
            return Err(AppError::NotFound("Notification not found".to_string()));
        }

        Ok(rows.remove(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recipient_filter_follows_the_role() {
        let doctor = Principal {
            id: Uuid::nil(),
            email: "d@example.com".to_string(),
            role: Role::Doctor,
        };
        assert_eq!(
            recipient_filter(&doctor),
            format!("or=(doctor_id.eq.{},is_general.is.true)", Uuid::nil())
        );

        let patient = Principal {
            id: Uuid::nil(),
            email: "p@example.com".to_string(),
            role: Role::Patient,
        };
        assert!(recipient_filter(&patient).starts_with("or=(patient_id.eq."));
    }
}
