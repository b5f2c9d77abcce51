use tracing::debug;
use uuid::Uuid;

use shared_database::state::AppState;
use shared_database::store::StoreClient;
use shared_models::error::AppError;
use shared_models::response::Pagination;

use crate::models::{
    DoctorProfile, FilterSearchQuery, LocationSearchQuery, SpecialtySearchQuery,
};

const DEFAULT_LIMIT: u64 = 10;

pub struct DirectoryService<'a> {
    store: &'a StoreClient,
}

impl<'a> DirectoryService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { store: &state.store }
    }

    async fn search(
        &self,
        filters: Vec<String>,
        order: &str,
        limit: u64,
        offset: u64,
    ) -> Result<(Vec<DoctorProfile>, Pagination), AppError> {
        let mut path = String::from("/rest/v1/doctors?is_active=eq.true");
        for filter in &filters {
            path.push('&');
            path.push_str(filter);
        }
        path.push_str(&format!("&order={}&limit={}&offset={}", order, limit, offset));

        debug!("Directory search: {}", path);

        let (doctors, total) = self
            .store
            .select_with_count::<DoctorProfile>(&path)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok((doctors, Pagination::new(total, limit, offset)))
    }

    pub async fn search_by_specialty(
        &self,
        query: SpecialtySearchQuery,
    ) -> Result<(Vec<DoctorProfile>, Pagination), AppError> {
        let specialty = query
            .specialty
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| AppError::BadRequest("Specialty is required".to_string()))?;

        self.search(
            vec![format!("specialty=ilike.*{}*", specialty.trim())],
            "years_experience.desc",
            query.limit.unwrap_or(DEFAULT_LIMIT),
            query.offset.unwrap_or(0),
        )
        .await
    }

    pub async fn search_by_location(
        &self,
        query: LocationSearchQuery,
    ) -> Result<(Vec<DoctorProfile>, Pagination), AppError> {
        let city = query
            .city
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| AppError::BadRequest("City is required".to_string()))?;

        let mut filters = vec![format!("city=ilike.*{}*", city.trim())];
        if let Some(state) = query.state.filter(|s| !s.trim().is_empty()) {
            filters.push(format!("state=ilike.*{}*", state.trim()));
        }

        self.search(
            filters,
            "name.asc",
            query.limit.unwrap_or(DEFAULT_LIMIT),
            query.offset.unwrap_or(0),
        )
        .await
    }

    pub async fn filter(
        &self,
        query: FilterSearchQuery,
    ) -> Result<(Vec<DoctorProfile>, Pagination), AppError> {
        let mut filters = Vec::new();

        if let Some(specialty) = query.specialty.as_ref().filter(|s| !s.trim().is_empty()) {
            filters.push(format!("specialty=ilike.*{}*", specialty.trim()));
        }
        if let Some(rating_min) = query.rating_min.filter(|r| *r > 0.0) {
            filters.push(format!("rating=gte.{}", rating_min));
        }
        if let Some(years_min) = query.years_min.filter(|y| *y > 0) {
            filters.push(format!("years_experience=gte.{}", years_min));
        }

        self.search(
            filters,
            "rating.desc,years_experience.desc",
            query.limit.unwrap_or(DEFAULT_LIMIT),
            query.offset.unwrap_or(0),
        )
        .await
    }

    pub async fn get_profile(&self, doctor_id: &str) -> Result<DoctorProfile, AppError> {
        let doctor_id: Uuid = doctor_id
            .parse()
            .map_err(|_| AppError::BadRequest("Invalid doctor id".to_string()))?;

        let path = format!("/rest/v1/doctors?id=eq.{}&is_active=eq.true", doctor_id);
        let mut rows: Vec<DoctorProfile> = self
            .store
            .request(reqwest::Method::GET, &path, None)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if rows.is_empty() {
            return Err(AppError::NotFound("Doctor not found".to_string()));
        }

        Ok(rows.remove(0))
    }
}
