use std::sync::OnceLock;

use chrono::{NaiveDate, Utc};
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_database::scope::DOCTOR_AVAILABILITY;
use shared_database::state::AppState;
use shared_database::store::StoreClient;
use shared_models::error::AppError;

use crate::models::{AvailabilityCheck, AvailabilitySlot, SetHoursRequest, WorkDay};

// Zero-padded 24-hour clock; padding is what keeps the lexicographic range
// comparison below correct.
fn time_format() -> &'static Regex {
    static TIME_RE: OnceLock<Regex> = OnceLock::new();
    TIME_RE.get_or_init(|| Regex::new(r"^([01][0-9]|2[0-3]):[0-5][0-9]$").expect("valid regex"))
}

/// Inclusive at both bounds: a time equal to the start or the end of the
/// range counts as available.
pub fn within_hours(time: &str, start: &str, end: &str) -> bool {
    time >= start && time <= end
}

fn representation() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("Prefer", HeaderValue::from_static("return=representation"));
    headers
}

pub struct AvailabilityService<'a> {
    store: &'a StoreClient,
}

impl<'a> AvailabilityService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { store: &state.store }
    }

    pub async fn set_specialties(
        &self,
        doctor_id: Uuid,
        specialties: Vec<String>,
    ) -> Result<Value, AppError> {
        if specialties.is_empty() {
            return Err(AppError::ValidationError(
                "At least one specialty is required".to_string(),
            ));
        }

        let specialty = specialties.join(",");
        let path = format!("/rest/v1/doctors?id=eq.{}", doctor_id);
        let patch = json!({
            "specialty": specialty,
            "updated_at": Utc::now().to_rfc3339()
        });

        let mut rows: Vec<Value> = self
            .store
            .request_with_headers(Method::PATCH, &path, Some(patch), Some(representation()))
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if rows.is_empty() {
            return Err(AppError::NotFound("Doctor not found".to_string()));
        }

        Ok(rows.remove(0))
    }

    pub async fn get_specialties(&self, doctor_id: Uuid) -> Result<Vec<String>, AppError> {
        let path = format!("/rest/v1/doctors?select=specialty&id=eq.{}", doctor_id);
        let rows: Vec<Value> = self
            .store
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let row = rows
            .first()
            .ok_or_else(|| AppError::NotFound("Doctor not found".to_string()))?;

        let specialties = row["specialty"]
            .as_str()
            .map(|s| {
                s.split(',')
                    .map(|p| p.trim().to_string())
                    .filter(|p| !p.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(specialties)
    }

    /// Upsert per (doctor, weekday): update the existing range in place,
    /// insert otherwise. Returns the row and whether it was newly created.
    pub async fn set_hours(
        &self,
        doctor_id: Uuid,
        request: SetHoursRequest,
    ) -> Result<(AvailabilitySlot, bool), AppError> {
        let (day, start_time, end_time) = match (
            request.day.filter(|s| !s.is_empty()),
            request.start_time.filter(|s| !s.is_empty()),
            request.end_time.filter(|s| !s.is_empty()),
        ) {
            (Some(d), Some(s), Some(e)) => (d, s, e),
            _ => {
                return Err(AppError::ValidationError(
                    "Day, start time and end time are required".to_string(),
                ))
            }
        };

        let day: WorkDay = day
            .parse()
            .map_err(|_| AppError::ValidationError("Invalid day name".to_string()))?;

        if !time_format().is_match(&start_time) || !time_format().is_match(&end_time) {
            return Err(AppError::ValidationError(
                "Invalid time format (HH:MM)".to_string(),
            ));
        }

        if start_time >= end_time {
            return Err(AppError::ValidationError(
                "Start time must be before end time".to_string(),
            ));
        }

        debug!("Setting {} hours {}-{} for doctor {}", day, start_time, end_time, doctor_id);

        let existing: Vec<AvailabilitySlot> = DOCTOR_AVAILABILITY
            .list_filtered(
                self.store,
                doctor_id,
                &[("day_of_week", format!("eq.{}", day))],
                None,
                None,
            )
            .await?;

        if let Some(current) = existing.first() {
            let mut patch = serde_json::Map::new();
            patch.insert("start_time".to_string(), json!(start_time));
            patch.insert("end_time".to_string(), json!(end_time));
            patch.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));

            let updated = DOCTOR_AVAILABILITY
                .update(self.store, doctor_id, current.id, patch)
                .await?;
            return Ok((updated, false));
        }

        let now = Utc::now().to_rfc3339();
        let row = json!({
            "doctor_id": doctor_id,
            "day_of_week": day,
            "start_time": start_time,
            "end_time": end_time,
            "created_at": now,
            "updated_at": now
        });

        let created = DOCTOR_AVAILABILITY.insert(self.store, row).await?;
        Ok((created, true))
    }

    /// Weekday order Monday through Sunday; the store cannot order by day
    /// name, so the sort happens here.
    pub async fn get_hours(&self, doctor_id: Uuid) -> Result<Vec<AvailabilitySlot>, AppError> {
        let mut slots: Vec<AvailabilitySlot> =
            DOCTOR_AVAILABILITY.list(self.store, doctor_id, None).await?;

        slots.sort_by_key(|slot| slot.day_of_week.index());
        Ok(slots)
    }

    pub async fn delete_hours(&self, doctor_id: Uuid, day: &str) -> Result<(), AppError> {
        let day: WorkDay = day
            .parse()
            .map_err(|_| AppError::ValidationError("Invalid day name".to_string()))?;

        let path = format!(
            "/rest/v1/doctor_availability?doctor_id=eq.{}&day_of_week=eq.{}",
            doctor_id, day
        );

        let rows: Vec<Value> = self
            .store
            .request_with_headers(Method::DELETE, &path, None, Some(representation()))
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if rows.is_empty() {
            return Err(AppError::NotFound(
                "No working hours for that day".to_string(),
            ));
        }

        Ok(())
    }

    /// Availability for a candidate date and time: map the calendar date to
    /// its weekday, then test the stored range inclusively at both bounds.
    pub async fn check(
        &self,
        doctor_id: Uuid,
        date: &str,
        time: &str,
    ) -> Result<AvailabilityCheck, AppError> {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| AppError::BadRequest("Invalid date format".to_string()))?;

        let day = WorkDay::from_date(date);

        let slots: Vec<AvailabilitySlot> = DOCTOR_AVAILABILITY
            .list_filtered(
                self.store,
                doctor_id,
                &[("day_of_week", format!("eq.{}", day))],
                None,
                None,
            )
            .await?;

        let Some(slot) = slots.first() else {
            return Ok(AvailabilityCheck {
                available: false,
                day_of_week: day.to_string(),
                start_time: None,
                end_time: None,
                message: "Doctor is not available that day".to_string(),
            });
        };

        let available = within_hours(time, &slot.start_time, &slot.end_time);

        Ok(AvailabilityCheck {
            available,
            day_of_week: day.to_string(),
            start_time: Some(slot.start_time.clone()),
            end_time: Some(slot.end_time.clone()),
            message: if available {
                "Doctor is available".to_string()
            } else {
                "Doctor is not available at that time".to_string()
            },
        })
    }
}
