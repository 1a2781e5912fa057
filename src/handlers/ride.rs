//! 拼车的 HTTP 处理器

use crate::{
    auth::middleware::AuthContext, error::AppError, middleware::AppState, models::ride::*,
    repository::RideRepository,
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

/// 发布行程
pub async fn create_ride(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    payload: Result<Json<CreateRideRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = payload?;
    req.validate()?;

    let repo = RideRepository::new(state.db.clone());
    let ride = repo.create(&req, auth_context.user_id).await?;

    tracing::info!(ride_id = %ride.id, owner_id = %ride.owner_id, "Ride created");

    Ok((StatusCode::CREATED, Json(ride)))
}

/// 列出行程
pub async fn list_rides(
    State(state): State<Arc<AppState>>,
    filters: Result<Query<RideFilters>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(filters) = filters?;
    let repo = RideRepository::new(state.db.clone());
    let rides = repo.list(&filters).await?;

    Ok(Json(json!({
        "rides": rides,
        "count": rides.len()
    })))
}

/// 获取行程详情
pub async fn get_ride(
    State(state): State<Arc<AppState>>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(id) = id?;
    let repo = RideRepository::new(state.db.clone());
    let ride = repo.get(id).await?.ok_or_else(|| AppError::not_found("Ride"))?;

    Ok(Json(ride))
}
