//! Ride repository (拼车数据访问)

use super::contains_pattern;
use crate::{
    error::AppError,
    models::{page_bounds, ride::*},
};
use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

pub struct RideRepository {
    db: SqlitePool,
}

impl RideRepository {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// 创建行程，owner 为当前认证用户
    pub async fn create(&self, req: &CreateRideRequest, owner_id: Uuid) -> Result<Ride, AppError> {
        let ride = Ride {
            id: Uuid::new_v4(),
            owner_id,
            origin: req.origin.trim().to_string(),
            destination: req.destination.trim().to_string(),
            departure_at: req.departure_at,
            seats_available: req.seats_available,
            price_per_seat: req.price_per_seat,
            notes: req.notes.clone(),
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO rides (
                id, owner_id, origin, destination, departure_at,
                seats_available, price_per_seat, notes, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(ride.id)
        .bind(ride.owner_id)
        .bind(&ride.origin)
        .bind(&ride.destination)
        .bind(ride.departure_at)
        .bind(ride.seats_available)
        .bind(ride.price_per_seat)
        .bind(&ride.notes)
        .bind(ride.created_at)
        .execute(&self.db)
        .await?;

        Ok(ride)
    }

    /// 获取行程
    pub async fn get(&self, id: Uuid) -> Result<Option<Ride>, AppError> {
        let ride = sqlx::query_as::<_, Ride>("SELECT * FROM rides WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(ride)
    }

    /// 列出行程，按出发时间排序
    pub async fn list(&self, filters: &RideFilters) -> Result<Vec<Ride>, AppError> {
        let (limit, offset) = page_bounds(filters.limit, filters.offset);
        let mut query = QueryBuilder::<Sqlite>::new("SELECT * FROM rides WHERE 1=1");

        if let Some(origin) = &filters.origin {
            query
                .push(" AND origin LIKE ")
                .push_bind(contains_pattern(origin))
                .push(" ESCAPE '\\'");
        }
        if let Some(destination) = &filters.destination {
            query
                .push(" AND destination LIKE ")
                .push_bind(contains_pattern(destination))
                .push(" ESCAPE '\\'");
        }
        if let Some(date) = filters.date {
            // departure_at 以 RFC 3339 文本存储，前 10 位即日期
            query
                .push(" AND substr(departure_at, 1, 10) = ")
                .push_bind(date.format("%Y-%m-%d").to_string());
        }
        if let Some(min_seats) = filters.min_seats {
            query.push(" AND seats_available >= ").push_bind(min_seats);
        }

        query
            .push(" ORDER BY departure_at LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let rides = query.build_query_as::<Ride>().fetch_all(&self.db).await?;

        Ok(rides)
    }
}
