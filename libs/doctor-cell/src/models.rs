use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// The seven weekday names a working-hours record may carry. Stored as the
/// English day name; ordering for display is Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl WorkDay {
    pub fn index(&self) -> u8 {
        match self {
            WorkDay::Monday => 1,
            WorkDay::Tuesday => 2,
            WorkDay::Wednesday => 3,
            WorkDay::Thursday => 4,
            WorkDay::Friday => 5,
            WorkDay::Saturday => 6,
            WorkDay::Sunday => 7,
        }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        match date.weekday() {
            Weekday::Mon => WorkDay::Monday,
            Weekday::Tue => WorkDay::Tuesday,
            Weekday::Wed => WorkDay::Wednesday,
            Weekday::Thu => WorkDay::Thursday,
            Weekday::Fri => WorkDay::Friday,
            Weekday::Sat => WorkDay::Saturday,
            Weekday::Sun => WorkDay::Sunday,
        }
    }
}

impl fmt::Display for WorkDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkDay::Monday => "Monday",
            WorkDay::Tuesday => "Tuesday",
            WorkDay::Wednesday => "Wednesday",
            WorkDay::Thursday => "Thursday",
            WorkDay::Friday => "Friday",
            WorkDay::Saturday => "Saturday",
            WorkDay::Sunday => "Sunday",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for WorkDay {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Monday" => Ok(WorkDay::Monday),
            "Tuesday" => Ok(WorkDay::Tuesday),
            "Wednesday" => Ok(WorkDay::Wednesday),
            "Thursday" => Ok(WorkDay::Thursday),
            "Friday" => Ok(WorkDay::Friday),
            "Saturday" => Ok(WorkDay::Saturday),
            "Sunday" => Ok(WorkDay::Sunday),
            _ => Err(()),
        }
    }
}

/// At most one working-hours range per doctor per weekday.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilitySlot {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub day_of_week: WorkDay,
    pub start_time: String,
    pub end_time: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetHoursRequest {
    pub day: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetSpecialtiesRequest {
    pub specialties: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AvailabilityCheckQuery {
    pub date: Option<String>,
    pub time: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AvailabilityCheck {
    pub available: bool,
    pub day_of_week: String,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub message: String,
}

/// Public directory profile; shares its id with the owning account row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub specialty: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub years_experience: Option<i32>,
    pub rating: Option<f64>,
    pub total_reviews: Option<i32>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub profile_photo: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpecialtySearchQuery {
    pub specialty: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocationSearchQuery {
    pub city: Option<String>,
    pub state: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FilterSearchQuery {
    pub specialty: Option<String>,
    pub rating_min: Option<f64>,
    pub years_min: Option<i64>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekday_names_round_trip() {
        for name in [
            "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday",
        ] {
            assert_eq!(name.parse::<WorkDay>().unwrap().to_string(), name);
        }
        assert!("monday".parse::<WorkDay>().is_err());
        assert!("Funday".parse::<WorkDay>().is_err());
    }

    #[test]
    fn calendar_dates_map_to_weekday_names() {
        // 2025-06-09 is a Monday.
        let date = NaiveDate::from_ymd_opt(2025, 6, 9).unwrap();
        assert_eq!(WorkDay::from_date(date), WorkDay::Monday);
        let sunday = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        assert_eq!(WorkDay::from_date(sunday), WorkDay::Sunday);
    }

    #[test]
    fn display_order_is_monday_first() {
        assert!(WorkDay::Monday.index() < WorkDay::Sunday.index());
        assert_eq!(WorkDay::Thursday.index(), 4);
    }
}
