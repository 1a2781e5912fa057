//! Historical site repository (历史遗迹数据访问)

use super::contains_pattern;
use crate::{
    error::AppError,
    models::{page_bounds, site::*},
};
use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

pub struct SiteRepository {
    db: SqlitePool,
}

impl SiteRepository {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn create(&self, req: &CreateSiteRequest, owner_id: Uuid) -> Result<Site, AppError> {
        let site = Site {
            id: Uuid::new_v4(),
            owner_id: Some(owner_id),
            name: req.name.trim().to_string(),
            city: req.city.trim().to_string(),
            era: req.era.clone(),
            description: req.description.clone(),
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO sites (id, owner_id, name, city, era, description, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(site.id)
        .bind(site.owner_id)
        .bind(&site.name)
        .bind(&site.city)
        .bind(&site.era)
        .bind(&site.description)
        .bind(site.created_at)
        .execute(&self.db)
        .await?;

        Ok(site)
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Site>, AppError> {
        let site = sqlx::query_as::<_, Site>("SELECT * FROM sites WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(site)
    }

    pub async fn list(&self, filters: &SiteFilters) -> Result<Vec<Site>, AppError> {
        let (limit, offset) = page_bounds(filters.limit, filters.offset);
        let mut query = QueryBuilder::<Sqlite>::new("SELECT * FROM sites WHERE 1=1");

        if let Some(city) = &filters.city {
            query
                .push(" AND city = ")
                .push_bind(city.trim().to_string())
                .push(" COLLATE NOCASE");
        }
        if let Some(era) = &filters.era {
            query
                .push(" AND era = ")
                .push_bind(era.trim().to_string())
                .push(" COLLATE NOCASE");
        }
        if let Some(q) = &filters.q {
            let pattern = contains_pattern(q);
            query
                .push(" AND (name LIKE ")
                .push_bind(pattern.clone())
                .push(" ESCAPE '\\' OR description LIKE ")
                .push_bind(pattern)
                .push(" ESCAPE '\\')");
        }

        query
            .push(" ORDER BY name LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let sites = query.build_query_as::<Site>().fetch_all(&self.db).await?;

        Ok(sites)
    }
}
