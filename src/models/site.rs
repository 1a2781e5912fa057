//! Historical site models

use super::not_blank;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A historical site. Seeded sites have no owner.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Site {
    pub id: Uuid,
    pub owner_id: Option<Uuid>,
    pub name: String,
    pub city: String,
    pub era: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Create site request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSiteRequest {
    #[validate(custom(function = "not_blank", message = "name is required"))]
    pub name: String,
    #[validate(custom(function = "not_blank", message = "city is required"))]
    pub city: String,
    #[validate(length(max = 100))]
    pub era: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

/// Site list filters
#[derive(Debug, Default, Deserialize)]
pub struct SiteFilters {
    /// Exact match, case-insensitive
    pub city: Option<String>,
    pub era: Option<String>,
    /// Substring search over name and description
    pub q: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
