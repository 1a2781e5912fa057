//! HTTP 中间件
//! 应用状态、请求追踪、固定窗口限流

use crate::{
    auth::jwt::JwtService, config::AppConfig, error::AppError, repository::SqliteCredentialStore,
    services::AuthService,
};
use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use dashmap::DashMap;
use sqlx::SqlitePool;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::Instrument;
use uuid::Uuid;

/// 应用状态
///
/// 签名密钥在构造 JwtService 时读取一次，之后只读。
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub db: SqlitePool,
    pub jwt_service: Arc<JwtService>,
    pub auth_service: Arc<AuthService>,
    pub rate_limiter: Arc<FixedWindowLimiter>,
}

impl AppState {
    pub fn new(config: AppConfig, db: SqlitePool) -> Result<Self, AppError> {
        let jwt_service = Arc::new(JwtService::from_config(&config)?);
        let store = Arc::new(SqliteCredentialStore::new(db.clone()));
        let auth_service = Arc::new(AuthService::new(store, jwt_service.clone()));
        let rate_limiter = Arc::new(FixedWindowLimiter::new(
            config.security.rate_limit_max_requests,
            Duration::from_secs(config.security.rate_limit_window_secs),
        ));

        Ok(Self {
            config,
            db,
            jwt_service,
            auth_service,
            rate_limiter,
        })
    }
}

/// 请求追踪中间件
/// 为每个请求生成 trace_id 和 request_id，并记录指标
pub async fn request_tracking_middleware(req: Request, next: Next) -> Response {
    let trace_id = extract_or_generate_trace_id(req.headers());
    let request_id = Uuid::new_v4().to_string();

    let method = req.method().to_string();
    // 不记录查询参数
    let path = req.uri().path().to_string();

    let span = tracing::info_span!(
        "http_request",
        trace_id = %trace_id,
        request_id = %request_id,
        method = %method,
        path = %path,
    );

    async move {
        let start = Instant::now();

        let mut response = next.run(req).await;

        let elapsed = start.elapsed();
        let status = response.status().as_u16();

        metrics::counter!(
            "http_requests_total",
            "method" => method.clone(),
            "status" => status.to_string()
        )
        .increment(1);
        metrics::histogram!("http_request_duration_seconds").record(elapsed.as_secs_f64());

        tracing::info!(
            method = %method,
            path = %path,
            status = status,
            elapsed_ms = elapsed.as_millis() as u64,
            "Request completed"
        );

        if let Ok(value) = HeaderValue::from_str(&trace_id) {
            response.headers_mut().insert("x-trace-id", value);
        }
        if let Ok(value) = HeaderValue::from_str(&request_id) {
            response.headers_mut().insert("x-request-id", value);
        }

        response
    }
    .instrument(span)
    .await
}

/// 从请求头中提取或生成 trace_id
fn extract_or_generate_trace_id(headers: &HeaderMap) -> String {
    headers
        .get("x-trace-id")
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty() && s.len() <= 128)
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

/// 超过此数量时清理过期窗口
const MAX_TRACKED_IPS: usize = 10_000;

/// 速率限制中间件（按客户端 IP 的固定窗口计数）
pub async fn rate_limit_middleware(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());
    let client_ip = client_ip(req.headers(), peer, state.config.security.trust_proxy);

    if state.rate_limiter.tracked() > MAX_TRACKED_IPS {
        state.rate_limiter.purge_expired(Instant::now());
    }

    if !state.rate_limiter.check(client_ip) {
        tracing::warn!(client_ip = %client_ip, "Rate limit exceeded");
        metrics::counter!("rate_limit_rejections_total").increment(1);
        return Err(AppError::RateLimitExceeded);
    }

    Ok(next.run(req).await)
}

/// 获取客户端 IP
///
/// 仅在 `trust_proxy` 开启时读取 X-Forwarded-For（第一个地址）和 X-Real-IP；
/// 否则使用连接地址。没有连接信息（进程内调用）时回退到回环地址。
pub fn client_ip(headers: &HeaderMap, peer: Option<IpAddr>, trust_proxy: bool) -> IpAddr {
    if trust_proxy {
        if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
            if let Some(Ok(ip)) = forwarded.split(',').next().map(|s| s.trim().parse()) {
                tracing::debug!(client_ip = %ip, "Got IP from X-Forwarded-For");
                return ip;
            }
        }

        if let Some(Ok(ip)) = headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.trim().parse())
        {
            tracing::debug!(client_ip = %ip, "Got IP from X-Real-IP");
            return ip;
        }
    }

    peer.unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST))
}

// ==================== 限流服务 ====================

/// 固定窗口计数器，按 IP 分别计数
pub struct FixedWindowLimiter {
    windows: DashMap<IpAddr, Window>,
    max_requests: u32,
    window: Duration,
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started_at: Instant,
    count: u32,
}

impl FixedWindowLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            windows: DashMap::new(),
            max_requests,
            window,
        }
    }

    /// 检查是否允许请求，允许时计数加一
    pub fn check(&self, ip: IpAddr) -> bool {
        self.check_at(ip, Instant::now())
    }

    pub fn check_at(&self, ip: IpAddr, now: Instant) -> bool {
        let mut entry = self.windows.entry(ip).or_insert(Window {
            started_at: now,
            count: 0,
        });

        if now.saturating_duration_since(entry.started_at) >= self.window {
            entry.started_at = now;
            entry.count = 0;
        }

        if entry.count < self.max_requests {
            entry.count += 1;
            true
        } else {
            false
        }
    }

    /// 清理已过期的窗口
    pub fn purge_expired(&self, now: Instant) {
        self.windows
            .retain(|_, w| now.saturating_duration_since(w.started_at) < self.window);
    }

    /// 当前跟踪的 IP 数
    pub fn tracked(&self) -> usize {
        self.windows.len()
    }
}
