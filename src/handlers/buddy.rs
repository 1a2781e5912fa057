//! 旅伴匹配的 HTTP 处理器

use crate::{
    auth::middleware::AuthContext, error::AppError, middleware::AppState, models::buddy::*,
    repository::BuddyRepository,
};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// 发布旅伴帖子
pub async fn create_post(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    payload: Result<Json<CreateBuddyPostRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = payload?;
    req.validate()?;

    let repo = BuddyRepository::new(state.db.clone());
    let post = repo.create(&req, auth_context.user_id).await?;

    Ok((StatusCode::CREATED, Json(post)))
}

/// 列出旅伴帖子
pub async fn list_posts(
    State(state): State<Arc<AppState>>,
    filters: Result<Query<BuddyFilters>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(filters) = filters?;
    let repo = BuddyRepository::new(state.db.clone());
    let posts = repo.list(&filters).await?;

    Ok(Json(json!({
        "posts": posts,
        "count": posts.len()
    })))
}

pub async fn get_post(
    State(state): State<Arc<AppState>>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(id) = id?;
    let repo = BuddyRepository::new(state.db.clone());
    let post = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found("Buddy post"))?;

    Ok(Json(post))
}
