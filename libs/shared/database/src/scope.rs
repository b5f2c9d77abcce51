use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;
use uuid::Uuid;

use shared_models::error::AppError;

use crate::store::StoreClient;

/// A doctor-scoped table. Every statement issued through here carries the
/// owner filter in its WHERE clause, so a row can never be read, patched, or
/// deleted across tenants regardless of what the calling route does.
#[derive(Debug, Clone, Copy)]
pub struct ScopedTable {
    pub table: &'static str,
    pub owner_column: &'static str,
    pub entity: &'static str,
}

pub const PATIENTS: ScopedTable = ScopedTable {
    table: "patients",
    owner_column: "doctor_id",
    entity: "Patient",
};

pub const APPOINTMENTS: ScopedTable = ScopedTable {
    table: "appointments",
    owner_column: "doctor_id",
    entity: "Appointment",
};

pub const MEDICAL_RECORDS: ScopedTable = ScopedTable {
    table: "medical_records",
    owner_column: "doctor_id",
    entity: "Medical record",
};

pub const DOCTOR_AVAILABILITY: ScopedTable = ScopedTable {
    table: "doctor_availability",
    owner_column: "doctor_id",
    entity: "Availability slot",
};

pub const SUBSCRIPTIONS: ScopedTable = ScopedTable {
    table: "subscriptions",
    owner_column: "doctor_id",
    entity: "Subscription",
};

pub const GPT_INTERACTIONS: ScopedTable = ScopedTable {
    table: "gpt_interactions",
    owner_column: "doctor_id",
    entity: "Interaction",
};

fn store_error(err: anyhow::Error) -> AppError {
    AppError::Database(err.to_string())
}

fn representation() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("Prefer", HeaderValue::from_static("return=representation"));
    headers
}

impl ScopedTable {
    fn base(&self) -> String {
        format!("/rest/v1/{}", self.table)
    }

    fn owned(&self, owner: Uuid) -> String {
        format!("{}?{}=eq.{}", self.base(), self.owner_column, owner)
    }

    fn not_found(&self) -> AppError {
        AppError::NotFound(format!("{} not found", self.entity))
    }

    pub async fn list<T>(
        &self,
        store: &StoreClient,
        owner: Uuid,
        order: Option<&str>,
    ) -> Result<Vec<T>, AppError>
    where
        T: DeserializeOwned,
    {
        self.list_filtered(store, owner, &[], order, None).await
    }

    /// Scoped list with extra `column=op.value` filters appended to the owner
    /// filter.
    pub async fn list_filtered<T>(
        &self,
        store: &StoreClient,
        owner: Uuid,
        filters: &[(&str, String)],
        order: Option<&str>,
        limit: Option<u64>,
    ) -> Result<Vec<T>, AppError>
    where
        T: DeserializeOwned,
    {
        let mut path = self.owned(owner);
        for (column, value) in filters {
            path.push_str(&format!("&{}={}", column, value));
        }
        if let Some(order) = order {
            path.push_str(&format!("&order={}", order));
        }
        if let Some(limit) = limit {
            path.push_str(&format!("&limit={}", limit));
        }

        store
            .request(Method::GET, &path, None)
            .await
            .map_err(store_error)
    }

    pub async fn find<T>(
        &self,
        store: &StoreClient,
        owner: Uuid,
        id: Uuid,
    ) -> Result<Option<T>, AppError>
    where
        T: DeserializeOwned,
    {
        let path = format!("{}&id=eq.{}", self.owned(owner), id);
        let mut rows: Vec<T> = store
            .request(Method::GET, &path, None)
            .await
            .map_err(store_error)?;

        if rows.is_empty() {
            Ok(None)
        } else {
            Ok(Some(rows.remove(0)))
        }
    }

    /// Scoped lookup; an existing row owned by someone else is
    /// indistinguishable from an absent one.
    pub async fn get<T>(&self, store: &StoreClient, owner: Uuid, id: Uuid) -> Result<T, AppError>
    where
        T: DeserializeOwned,
    {
        self.find(store, owner, id)
            .await?
            .ok_or_else(|| self.not_found())
    }

    pub async fn insert<T>(&self, store: &StoreClient, row: Value) -> Result<T, AppError>
    where
        T: DeserializeOwned,
    {
        debug!("Inserting into {}", self.table);

        let mut rows: Vec<T> = store
            .request_with_headers(Method::POST, &self.base(), Some(row), Some(representation()))
            .await
            .map_err(store_error)?;

        if rows.is_empty() {
            return Err(AppError::Database(format!(
                "Insert into {} returned no row",
                self.table
            )));
        }

        Ok(rows.remove(0))
    }

    /// Partial update. Omitted columns keep their stored values; the ownership
    /// predicate rides inside the single write statement, so there is no
    /// check-then-write window for the row itself.
    pub async fn update<T>(
        &self,
        store: &StoreClient,
        owner: Uuid,
        id: Uuid,
        patch: Map<String, Value>,
    ) -> Result<T, AppError>
    where
        T: DeserializeOwned,
    {
        let path = format!("{}&id=eq.{}", self.owned(owner), id);

        let mut rows: Vec<T> = store
            .request_with_headers(
                Method::PATCH,
                &path,
                Some(Value::Object(patch)),
                Some(representation()),
            )
            .await
            .map_err(store_error)?;

        if rows.is_empty() {
            return Err(self.not_found());
        }

        Ok(rows.remove(0))
    }

    /// Hard delete. Deleting an absent or non-owned id reports not-found,
    /// never a silent success.
    pub async fn delete(&self, store: &StoreClient, owner: Uuid, id: Uuid) -> Result<(), AppError> {
        let path = format!("{}&id=eq.{}", self.owned(owner), id);

        let rows: Vec<Value> = store
            .request_with_headers(Method::DELETE, &path, None, Some(representation()))
            .await
            .map_err(store_error)?;

        if rows.is_empty() {
            return Err(self.not_found());
        }

        Ok(())
    }
}

/// Transitive ownership guard: dependent entities (appointments, medical
/// records, assistant interactions) are authorized through their parent
/// Patient. Callers still filter the child statement by doctor id afterwards.
pub async fn assert_owned_patient(
    store: &StoreClient,
    patient_id: Uuid,
    doctor_id: Uuid,
) -> Result<(), AppError> {
    let path = format!(
        "/rest/v1/patients?select=id&id=eq.{}&doctor_id=eq.{}",
        patient_id, doctor_id
    );

    let rows: Vec<Value> = store
        .request(Method::GET, &path, None)
        .await
        .map_err(store_error)?;

    if rows.is_empty() {
        return Err(AppError::Forbidden(
            "Access denied: patient does not belong to this doctor".to_string(),
        ));
    }

    Ok(())
}
