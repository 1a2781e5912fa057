//! 认证服务：注册、登录、当前用户

use crate::{
    auth::{jwt::JwtService, middleware::AuthContext, password::PasswordHasher},
    error::AppError,
    models::{auth::*, user::*},
    repository::CredentialStore,
};
use once_cell::sync::OnceCell;
use std::sync::Arc;
use validator::Validate;

/// 邮箱不存在时用于校验的占位密码
const DUMMY_PASSWORD: &str = "wayfarer-login-timing-placeholder";

pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    jwt_service: Arc<JwtService>,
    hasher: PasswordHasher,
    /// 占位摘要，首次登录未命中时生成
    dummy_hash: OnceCell<String>,
}

impl AuthService {
    pub fn new(store: Arc<dyn CredentialStore>, jwt_service: Arc<JwtService>) -> Self {
        Self {
            store,
            jwt_service,
            hasher: PasswordHasher::new(),
            dummy_hash: OnceCell::new(),
        }
    }

    /// 用户注册
    pub async fn register(&self, req: RegisterRequest) -> Result<AuthResponse, AppError> {
        req.validate()?;

        let email = req.email.trim();
        let name = req.name.trim();
        let phone = req
            .phone
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty());

        // 应用层检查；并发注册由唯一约束兜底
        if self.store.find_by_email(email).await?.is_some() {
            tracing::info!("Registration rejected: email already registered");
            return Err(AppError::DuplicateEmail);
        }

        let password_hash = self.hash_password(req.password).await?;
        let user = self.store.create(email, &password_hash, name, phone).await?;

        tracing::info!(user_id = %user.id, "User registered");

        self.issue_response(user)
    }

    /// 用户登录
    pub async fn login(&self, req: LoginRequest) -> Result<AuthResponse, AppError> {
        req.validate()?;

        let Some(user) = self.store.find_by_email(req.email.trim()).await? else {
            // 用户不存在时同样执行一次 Argon2 校验，两条失败路径耗时一致
            let dummy_hash = self.dummy_hash().await?;
            self.verify_password(req.password, dummy_hash).await?;
            tracing::info!("Login failed");
            return Err(AppError::InvalidCredentials);
        };

        if !self.verify_password(req.password, user.password_hash.clone()).await? {
            tracing::info!(user_id = %user.id, "Login failed");
            return Err(AppError::InvalidCredentials);
        }

        tracing::info!(user_id = %user.id, "User logged in");

        self.issue_response(user)
    }

    /// 获取当前认证用户的公开信息
    pub async fn current_user(&self, auth_context: &AuthContext) -> Result<PublicUser, AppError> {
        let user = self
            .store
            .find_by_email(&auth_context.email)
            .await?
            .filter(|user| user.id == auth_context.user_id)
            .ok_or_else(|| AppError::not_found("User"))?;

        Ok(PublicUser::from(user))
    }

    async fn dummy_hash(&self) -> Result<String, AppError> {
        if let Some(hash) = self.dummy_hash.get() {
            return Ok(hash.clone());
        }

        let hash = self.hash_password(DUMMY_PASSWORD.to_string()).await?;
        Ok(self.dummy_hash.get_or_init(|| hash).clone())
    }

    fn issue_response(&self, user: User) -> Result<AuthResponse, AppError> {
        let token = self.jwt_service.issue(&user.id, &user.email)?;

        Ok(AuthResponse {
            token,
            token_type: "Bearer",
            expires_in: self.jwt_service.ttl_secs(),
            user: PublicUser::from(user),
        })
    }

    /// Argon2 是 CPU 密集型操作，放到阻塞线程池执行
    async fn hash_password(&self, password: String) -> Result<String, AppError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))?
    }

    async fn verify_password(&self, password: String, hash: String) -> Result<bool, AppError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| AppError::Internal(format!("Password verification task failed: {}", e)))
    }
}
