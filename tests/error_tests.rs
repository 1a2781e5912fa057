//! 错误处理单元测试
//!
//! 测试应用错误类型的状态码与响应体

use axum::{http::StatusCode, response::IntoResponse};
use http_body_util::BodyExt;
use wayfarer::error::AppError;

// ==================== 错误状态码测试 ====================

#[test]
fn test_error_status_codes() {
    assert_eq!(AppError::Validation("x".to_string()).status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(AppError::DuplicateEmail.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(AppError::InvalidCredentials.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(AppError::MissingToken.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(AppError::InvalidToken.status_code(), StatusCode::FORBIDDEN);
    assert_eq!(AppError::not_found("Ride").status_code(), StatusCode::NOT_FOUND);
    assert_eq!(AppError::RateLimitExceeded.status_code(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        AppError::StoreUnavailable(sqlx::Error::PoolClosed).status_code(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
    assert_eq!(
        AppError::Internal("boom".to_string()).status_code(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

// ==================== 响应体测试 ====================

async fn body_json(error: AppError) -> (StatusCode, serde_json::Value) {
    let response = error.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_error_response_shape() {
    let (status, json) = body_json(AppError::InvalidCredentials).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], 400);
    assert_eq!(json["error"]["kind"], "invalid_credentials");
    assert_eq!(json["error"]["message"], "Invalid email or password");
    assert!(json["error"]["request_id"].is_string());
}

#[tokio::test]
async fn test_store_error_details_not_echoed() {
    let error = AppError::StoreUnavailable(sqlx::Error::Protocol(
        "disk I/O error at /var/lib/wayfarer.db".to_string(),
    ));
    let (status, json) = body_json(error).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"]["message"], "Internal server error");
    assert!(!json.to_string().contains("wayfarer.db"));
}

#[tokio::test]
async fn test_token_errors_do_not_reveal_reason() {
    let (_, json) = body_json(AppError::InvalidToken).await;
    let message = json["error"]["message"].as_str().unwrap().to_lowercase();

    assert!(!message.contains("expired"));
    assert!(!message.contains("signature"));
}
