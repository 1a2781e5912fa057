//! 服务层测试

use std::sync::Arc;
use wayfarer::{
    auth::{jwt::JwtService, middleware::AuthContext},
    error::AppError,
    models::auth::{LoginRequest, RegisterRequest},
    repository::{CredentialStore, SqliteCredentialStore},
    services::AuthService,
};

mod common;
use common::{create_test_config, setup_test_db, TEST_JWT_SECRET};

async fn setup() -> (AuthService, Arc<JwtService>, Arc<SqliteCredentialStore>) {
    let config = create_test_config();
    let pool = setup_test_db(&config).await;

    let jwt_service = Arc::new(JwtService::from_config(&config).unwrap());
    let store = Arc::new(SqliteCredentialStore::new(pool));
    let service = AuthService::new(store.clone(), jwt_service.clone());

    (service, jwt_service, store)
}

fn register_request(email: &str, password: &str, name: &str) -> RegisterRequest {
    RegisterRequest {
        email: email.to_string(),
        password: password.to_string(),
        name: name.to_string(),
        phone: None,
    }
}

fn login_request(email: &str, password: &str) -> LoginRequest {
    LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
    }
}

#[tokio::test]
async fn test_register_then_login_yields_verifiable_tokens() {
    let (service, jwt_service, _) = setup().await;

    let registered = service
        .register(register_request("alice@example.com", "pw12345", "Alice"))
        .await
        .unwrap();

    let identity = jwt_service.verify(&registered.token).unwrap();
    assert_eq!(identity.user_id, registered.user.id);
    assert_eq!(identity.email, "alice@example.com");

    let logged_in = service
        .login(login_request("alice@example.com", "pw12345"))
        .await
        .unwrap();

    let identity = jwt_service.verify(&logged_in.token).unwrap();
    assert_eq!(identity.user_id, registered.user.id);
    assert_eq!(logged_in.user.id, registered.user.id);
    assert_eq!(logged_in.user.name, "Alice");
}

#[tokio::test]
async fn test_password_is_not_stored_in_plaintext() {
    let (service, _, store) = setup().await;

    service
        .register(register_request("alice@example.com", "pw12345", "Alice"))
        .await
        .unwrap();

    let user = store.find_by_email("alice@example.com").await.unwrap().unwrap();
    assert_ne!(user.password_hash, "pw12345");
    assert!(!user.password_hash.contains("pw12345"));
    assert!(user.password_hash.starts_with("$argon2id$"));
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let (service, _, _) = setup().await;

    service
        .register(register_request("alice@example.com", "pw12345", "Alice"))
        .await
        .unwrap();

    let result = service
        .register(register_request("alice@example.com", "other-password", "Alice 2"))
        .await;

    assert!(matches!(result, Err(AppError::DuplicateEmail)));
}

#[tokio::test]
async fn test_unique_constraint_maps_to_duplicate_email() {
    let (_, _, store) = setup().await;

    store
        .create("race@example.com", "$argon2id$fake", "First", None)
        .await
        .unwrap();

    // 绕过应用层检查，直接触发唯一约束
    let result = store
        .create("race@example.com", "$argon2id$fake", "Second", None)
        .await;

    assert!(matches!(result, Err(AppError::DuplicateEmail)));
}

#[tokio::test]
async fn test_concurrent_registrations_admit_exactly_one() {
    let (service, _, _) = setup().await;
    let service = Arc::new(service);

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let service = service.clone();
            tokio::spawn(async move {
                service
                    .register(register_request(
                        "same@example.com",
                        &format!("password-{}", i),
                        "Racer",
                    ))
                    .await
            })
        })
        .collect();

    let mut created = 0;
    let mut duplicates = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => created += 1,
            Err(AppError::DuplicateEmail) => duplicates += 1,
            Err(e) => panic!("unexpected error: {}", e),
        }
    }

    assert_eq!(created, 1);
    assert_eq!(duplicates, 3);
}

#[tokio::test]
async fn test_login_failures_are_identical() {
    let (service, _, _) = setup().await;

    service
        .register(register_request("alice@example.com", "pw12345", "Alice"))
        .await
        .unwrap();

    let unknown = service
        .login(login_request("nobody@example.com", "pw12345"))
        .await
        .unwrap_err();
    let wrong = service
        .login(login_request("alice@example.com", "wrongpw"))
        .await
        .unwrap_err();

    assert!(matches!(unknown, AppError::InvalidCredentials));
    assert!(matches!(wrong, AppError::InvalidCredentials));
    assert_eq!(unknown.to_string(), wrong.to_string());
    assert_eq!(unknown.user_message(), wrong.user_message());
}

#[tokio::test]
async fn test_register_validation() {
    let (service, _, _) = setup().await;

    let result = service.register(register_request("", "pw12345", "Alice")).await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    let result = service
        .register(register_request("alice@example.com", "", "Alice"))
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    let result = service
        .register(register_request("alice@example.com", "pw12345", " "))
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_current_user_resolves_from_token_identity() {
    let (service, jwt_service, _) = setup().await;

    let registered = service
        .register(register_request("alice@example.com", "pw12345", "Alice"))
        .await
        .unwrap();
    let identity = jwt_service.verify(&registered.token).unwrap();

    let user = service
        .current_user(&AuthContext {
            user_id: identity.user_id,
            email: identity.email,
        })
        .await
        .unwrap();
    assert_eq!(user.id, registered.user.id);
    assert_eq!(user.email, registered.user.email);

    // 令牌中的 id 与存储不一致
    let result = service
        .current_user(&AuthContext {
            user_id: uuid::Uuid::new_v4(),
            email: "alice@example.com".to_string(),
        })
        .await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_tokens_from_rotated_secret_fail() {
    let (service, _, _) = setup().await;

    let registered = service
        .register(register_request("alice@example.com", "pw12345", "Alice"))
        .await
        .unwrap();

    assert!(JwtService::new(TEST_JWT_SECRET, 60).unwrap().verify(&registered.token).is_ok());
    let rotated = JwtService::new("rotated-secret-key-also-at-least-32-chars", 60).unwrap();
    assert!(matches!(rotated.verify(&registered.token), Err(AppError::InvalidToken)));
}
