//! Carpool ride models

use super::not_blank;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A ride offered by a driver
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Ride {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub origin: String,
    pub destination: String,
    pub departure_at: DateTime<Utc>,
    pub seats_available: i64,
    pub price_per_seat: Option<f64>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Create ride request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRideRequest {
    #[validate(custom(function = "not_blank", message = "origin is required"))]
    pub origin: String,
    #[validate(custom(function = "not_blank", message = "destination is required"))]
    pub destination: String,
    pub departure_at: DateTime<Utc>,
    #[validate(range(min = 1, max = 16, message = "seats_available must be between 1 and 16"))]
    pub seats_available: i64,
    #[validate(range(min = 0.0, message = "price_per_seat must not be negative"))]
    pub price_per_seat: Option<f64>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

/// Ride list filters (query string)
#[derive(Debug, Default, Deserialize)]
pub struct RideFilters {
    /// Substring match, case-insensitive
    pub origin: Option<String>,
    /// Substring match, case-insensitive
    pub destination: Option<String>,
    /// Departure day
    pub date: Option<NaiveDate>,
    pub min_seats: Option<i64>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
