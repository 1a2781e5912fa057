//! 测试公共模块
//! 提供测试辅助函数和测试工具

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use secrecy::Secret;
use serde_json::Value;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower::ServiceExt;
use wayfarer::{
    config::{AppConfig, DatabaseConfig, LoggingConfig, SecurityConfig, ServerConfig},
    db,
    middleware::AppState,
};

pub const TEST_JWT_SECRET: &str = "test-secret-key-for-testing-only-min-32-chars";

/// 创建测试配置（内存数据库）
pub fn create_test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig {
            addr: "127.0.0.1:0".to_string(),
            graceful_shutdown_timeout_secs: 5,
        },
        database: DatabaseConfig {
            url: Secret::new("sqlite::memory:".to_string()),
            max_connections: 1,
            min_connections: 1,
            acquire_timeout_secs: 5,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        },
        security: SecurityConfig {
            jwt_secret: Secret::new(TEST_JWT_SECRET.to_string()),
            token_ttl_secs: 86400,
            rate_limit_max_requests: 1000,
            rate_limit_window_secs: 60,
            trust_proxy: false,
        },
    }
}

/// 初始化测试数据库（每次调用都是独立的内存库）
pub async fn setup_test_db(config: &AppConfig) -> SqlitePool {
    let pool = db::create_pool(&config.database)
        .await
        .expect("Failed to create test database pool");

    db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

/// 创建测试应用状态
pub fn create_test_app_state(config: AppConfig, pool: SqlitePool) -> Arc<AppState> {
    Arc::new(AppState::new(config, pool).expect("Failed to create app state"))
}

/// 使用默认测试配置创建完整路由
pub async fn create_test_app() -> Router {
    let config = create_test_config();
    let pool = setup_test_db(&config).await;
    wayfarer::routes::create_router(create_test_app_state(config, pool))
}

/// 发送请求并解析 JSON 响应
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    token: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, json)
}

/// 注册用户并返回令牌
pub async fn register_user(app: &Router, email: &str, password: &str, name: &str) -> String {
    let (status, json) = send(
        app,
        Method::POST,
        "/register",
        Some(serde_json::json!({
            "email": email,
            "password": password,
            "name": name
        })),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "register failed: {}", json);
    json["token"].as_str().unwrap().to_string()
}
