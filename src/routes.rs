//! 路由注册
//! 创建所有 API 路由并应用中间件

use axum::{
    extract::DefaultBodyLimit,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::{auth::middleware::jwt_auth_middleware, handlers, middleware};

/// 请求体大小上限
const MAX_BODY_BYTES: usize = 64 * 1024;

/// 创建应用路由
///
/// 写操作（POST /rides、/buddies、/sites）和 /me 需要 Bearer 令牌；
/// 列表与详情公开访问。注册和登录受固定窗口限流保护。
pub fn create_router(state: Arc<middleware::AppState>) -> Router {
    let require_auth = from_fn_with_state(state.jwt_service.clone(), jwt_auth_middleware);
    let rate_limit = from_fn_with_state(state.clone(), middleware::rate_limit_middleware);

    // 认证路由（无需认证，但应用速率限制）
    let auth_routes = Router::new()
        .route(
            "/register",
            post(handlers::auth::register).route_layer(rate_limit.clone()),
        )
        .route(
            "/login",
            post(handlers::auth::login).route_layer(rate_limit),
        )
        .route(
            "/me",
            get(handlers::auth::me).route_layer(require_auth.clone()),
        );

    // 公开端点（健康检查）
    let health_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check));

    // 业务路由：GET 公开，POST 需要认证
    let resource_routes = Router::new()
        .route(
            "/rides",
            get(handlers::ride::list_rides)
                .merge(post(handlers::ride::create_ride).route_layer(require_auth.clone())),
        )
        .route("/rides/{id}", get(handlers::ride::get_ride))
        .route(
            "/buddies",
            get(handlers::buddy::list_posts)
                .merge(post(handlers::buddy::create_post).route_layer(require_auth.clone())),
        )
        .route("/buddies/{id}", get(handlers::buddy::get_post))
        .route(
            "/sites",
            get(handlers::site::list_sites)
                .merge(post(handlers::site::create_site).route_layer(require_auth)),
        )
        .route("/sites/{id}", get(handlers::site::get_site));

    Router::new()
        .merge(health_routes)
        .merge(auth_routes)
        .merge(resource_routes)
        .layer(
            ServiceBuilder::new()
                .layer(from_fn(middleware::request_tracking_middleware))
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(MAX_BODY_BYTES)),
        )
        .with_state(state)
}
