//! Buddy post repository (旅伴数据访问)

use super::contains_pattern;
use crate::{
    error::AppError,
    models::{buddy::*, page_bounds},
};
use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

pub struct BuddyRepository {
    db: SqlitePool,
}

impl BuddyRepository {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        req: &CreateBuddyPostRequest,
        owner_id: Uuid,
    ) -> Result<BuddyPost, AppError> {
        let post = BuddyPost {
            id: Uuid::new_v4(),
            owner_id,
            destination: req.destination.trim().to_string(),
            start_date: req.start_date,
            end_date: req.end_date,
            interests: req.interests.clone(),
            description: req.description.clone(),
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO buddy_posts (
                id, owner_id, destination, start_date, end_date,
                interests, description, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(post.id)
        .bind(post.owner_id)
        .bind(&post.destination)
        .bind(post.start_date)
        .bind(post.end_date)
        .bind(&post.interests)
        .bind(&post.description)
        .bind(post.created_at)
        .execute(&self.db)
        .await?;

        Ok(post)
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<BuddyPost>, AppError> {
        let post = sqlx::query_as::<_, BuddyPost>("SELECT * FROM buddy_posts WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(post)
    }

    /// 列出与 [from, to] 有交集的旅伴帖子
    pub async fn list(&self, filters: &BuddyFilters) -> Result<Vec<BuddyPost>, AppError> {
        let (limit, offset) = page_bounds(filters.limit, filters.offset);
        let mut query = QueryBuilder::<Sqlite>::new("SELECT * FROM buddy_posts WHERE 1=1");

        if let Some(destination) = &filters.destination {
            query
                .push(" AND destination LIKE ")
                .push_bind(contains_pattern(destination))
                .push(" ESCAPE '\\'");
        }
        if let Some(from) = filters.from {
            query.push(" AND end_date >= ").push_bind(from);
        }
        if let Some(to) = filters.to {
            query.push(" AND start_date <= ").push_bind(to);
        }

        query
            .push(" ORDER BY start_date, created_at LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let posts = query
            .build_query_as::<BuddyPost>()
            .fetch_all(&self.db)
            .await?;

        Ok(posts)
    }
}
