//! 历史遗迹的 HTTP 处理器

use crate::{
    auth::middleware::AuthContext, error::AppError, middleware::AppState, models::site::*,
    repository::SiteRepository,
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

/// 添加历史遗迹
pub async fn create_site(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    payload: Result<Json<CreateSiteRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = payload?;
    req.validate()?;

    let repo = SiteRepository::new(state.db.clone());
    let site = repo.create(&req, auth_context.user_id).await?;

    Ok((StatusCode::CREATED, Json(site)))
}

/// 列出历史遗迹
pub async fn list_sites(
    State(state): State<Arc<AppState>>,
    filters: Result<Query<SiteFilters>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(filters) = filters?;
    let repo = SiteRepository::new(state.db.clone());
    let sites = repo.list(&filters).await?;

    Ok(Json(json!({
        "sites": sites,
        "count": sites.len()
    })))
}

pub async fn get_site(
    State(state): State<Arc<AppState>>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(id) = id?;
    let repo = SiteRepository::new(state.db.clone());
    let site = repo.get(id).await?.ok_or_else(|| AppError::not_found("Site"))?;

    Ok(Json(site))
}
