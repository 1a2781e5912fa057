//! Travel-buddy post models

use super::not_blank;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// A traveller looking for company on a trip
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct BuddyPost {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub interests: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Create buddy post request
#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = "validate_date_range"))]
pub struct CreateBuddyPostRequest {
    #[validate(custom(function = "not_blank", message = "destination is required"))]
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[validate(length(max = 500))]
    pub interests: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

fn validate_date_range(req: &CreateBuddyPostRequest) -> Result<(), ValidationError> {
    if req.start_date > req.end_date {
        let mut err = ValidationError::new("date_range");
        err.message = Some("start_date must not be after end_date".into());
        return Err(err);
    }
    Ok(())
}

/// Buddy post list filters
///
/// `from`/`to` select posts whose trip overlaps the window.
#[derive(Debug, Default, Deserialize)]
pub struct BuddyFilters {
    pub destination: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(start: &str, end: &str) -> CreateBuddyPostRequest {
        CreateBuddyPostRequest {
            destination: "Lisbon".to_string(),
            start_date: start.parse().unwrap(),
            end_date: end.parse().unwrap(),
            interests: None,
            description: None,
        }
    }

    #[test]
    fn test_date_range_validation() {
        assert!(request("2026-05-01", "2026-05-10").validate().is_ok());
        assert!(request("2026-05-01", "2026-05-01").validate().is_ok());
        assert!(request("2026-05-10", "2026-05-01").validate().is_err());
    }
}
