//! 固定窗口速率限制
//!
//! 挂在单个 resource 上使用，例如登录、结算和文档分析：
//!
//! ```rust,ignore
//! web::resource("/materials/{id}/analysis")
//!     .wrap(RateLimit::analysis())
//!     .route(web::post().to(analyze_material))
//! ```
//!
//! 已登录请求按用户计数，否则按客户端 IP；超限返回 429 并带 `Retry-After`。

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    http::header::CONTENT_TYPE,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use moka::future::Cache;
use once_cell::sync::Lazy;
use std::net::IpAddr;
use std::rc::Rc;
use std::time::Duration;
use tracing::warn;

use crate::models::{ApiResponse, ErrorCode};

/// 全局速率限制缓存
/// 键: 前缀:IP 或 前缀:用户，值: (窗口开始时间, 请求计数)
static RATE_LIMIT_CACHE: Lazy<Cache<String, (i64, u32)>> = Lazy::new(|| {
    Cache::builder()
        .time_to_live(Duration::from_secs(3600))
        .max_capacity(100_000)
        .build()
});

/// 速率限制配置
#[derive(Clone)]
pub struct RateLimit {
    /// 时间窗口内允许的最大请求数
    max_requests: u32,
    /// 时间窗口（秒）
    window_secs: u64,
    /// 限制键前缀（用于区分不同端点）
    key_prefix: String,
}

impl RateLimit {
    /// 创建新的速率限制器
    ///
    /// # 参数
    /// - `max_requests`: 时间窗口内允许的最大请求数
    /// - `window_secs`: 时间窗口（秒）
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window_secs,
            key_prefix: String::new(),
        }
    }

    /// 设置限制键前缀
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.key_prefix = prefix.to_string();
        self
    }

    /// 登录端点限制：5次/分钟/IP
    pub fn login() -> Self {
        Self::new(5, 60).with_prefix("login")
    }

    /// 注册端点限制：3次/分钟/IP
    pub fn register() -> Self {
        Self::new(3, 60).with_prefix("register")
    }

    /// 文档分析限制：每次都会调用大模型，5次/10分钟/用户
    pub fn analysis() -> Self {
        Self::new(5, 600).with_prefix("analysis")
    }

    /// 结算 / 支付确认：20次/分钟/用户
    pub fn checkout() -> Self {
        Self::new(20, 60).with_prefix("checkout")
    }
}

/// 固定窗口计数：返回 (新状态, 是否放行)
fn next_window(
    state: Option<(i64, u32)>,
    now: i64,
    window_secs: u64,
    max: u32,
) -> ((i64, u32), bool) {
    match state {
        Some((start, count)) if now - start < window_secs as i64 => {
            if count >= max {
                ((start, count), false)
            } else {
                ((start, count + 1), true)
            }
        }
        _ => ((now, 1), max > 0),
    }
}

/// 客户端 IP：连接信息优先，其次 X-Forwarded-For 第一项、X-Real-IP
///
/// 部署在反向代理后时需由代理正确设置转发头，无效格式的头会被忽略。
fn extract_client_ip(req: &ServiceRequest) -> String {
    let connection_ip = req
        .connection_info()
        .realip_remote_addr()
        .map(|s| s.to_string());

    let forwarded = req
        .headers()
        .get("X-Forwarded-For")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next());
    let real_ip = req
        .headers()
        .get("X-Real-IP")
        .and_then(|v| v.to_str().ok());

    let valid = connection_ip
        .as_deref()
        .into_iter()
        .chain(forwarded)
        .chain(real_ip)
        .map(str::trim)
        .find(|ip| ip.parse::<IpAddr>().is_ok())
        .map(str::to_string);

    valid
        .or(connection_ip)
        .unwrap_or_else(|| "unknown".to_string())
}

/// 从请求中提取用户 ID（如果已认证）
fn extract_user_id(req: &ServiceRequest) -> Option<i64> {
    use crate::models::users::entities::User;
    req.extensions().get::<User>().map(|user| user.id)
}

/// 创建速率限制错误响应
fn create_rate_limit_response(retry_after: u64) -> HttpResponse {
    HttpResponse::build(StatusCode::TOO_MANY_REQUESTS)
        .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
        .insert_header(("Retry-After", retry_after.to_string()))
        .insert_header(("X-RateLimit-Remaining", "0"))
        .json(ApiResponse::<()>::error_empty(
            ErrorCode::RateLimitExceeded,
            "Too many requests, please try again later",
        ))
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            max_requests: self.max_requests,
            window_secs: self.window_secs,
            key_prefix: self.key_prefix.clone(),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    max_requests: u32,
    window_secs: u64,
    key_prefix: String,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let max_requests = self.max_requests;
        let window_secs = self.window_secs;
        let key_prefix = self.key_prefix.clone();

        Box::pin(async move {
            // 构建限制键
            let identifier = extract_user_id(&req)
                .map(|id| format!("user:{}", id))
                .unwrap_or_else(|| format!("ip:{}", extract_client_ip(&req)));

            let cache_key = if key_prefix.is_empty() {
                identifier
            } else {
                format!("{}:{}", key_prefix, identifier)
            };

            let now = chrono::Utc::now().timestamp();
            let previous = RATE_LIMIT_CACHE.get(&cache_key).await;
            let ((start, count), allowed) = next_window(previous, now, window_secs, max_requests);

            if !allowed {
                let retry_after = (start + window_secs as i64 - now).max(1) as u64;
                warn!(
                    "Rate limit exceeded for key: {} (count: {}/{})",
                    cache_key, count, max_requests
                );
                return Ok(req
                    .into_response(create_rate_limit_response(retry_after).map_into_right_body()));
            }

            RATE_LIMIT_CACHE.insert(cache_key.clone(), (start, count)).await;

            let remaining = max_requests.saturating_sub(count);
            req.extensions_mut().insert(RateLimitInfo {
                remaining,
                limit: max_requests,
                reset: window_secs,
            });

            // 继续处理请求
            let res = srv.call(req).await?.map_into_left_body();
            Ok(res)
        })
    }
}

/// 速率限制信息（可在响应中添加）
#[derive(Clone)]
pub struct RateLimitInfo {
    pub remaining: u32,
    pub limit: u32,
    pub reset: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_presets() {
        let login = RateLimit::login();
        assert_eq!(login.max_requests, 5);
        assert_eq!(login.window_secs, 60);
        assert_eq!(login.key_prefix, "login");

        let register = RateLimit::register();
        assert_eq!(register.max_requests, 3);
        assert_eq!(register.window_secs, 60);

        let analysis = RateLimit::analysis();
        assert_eq!(analysis.window_secs, 600);
        assert_eq!(analysis.key_prefix, "analysis");
    }

    #[test]
    fn test_fixed_window() {
        let (state, ok) = next_window(None, 1000, 60, 2);
        assert!(ok);
        assert_eq!(state, (1000, 1));

        let (state, ok) = next_window(Some(state), 1010, 60, 2);
        assert!(ok);
        assert_eq!(state, (1000, 2));

        let (state, ok) = next_window(Some(state), 1020, 60, 2);
        assert!(!ok);
        assert_eq!(state, (1000, 2));

        // 窗口过期后重新计数
        let (state, ok) = next_window(Some(state), 1061, 60, 2);
        assert!(ok);
        assert_eq!(state, (1061, 1));
    }
}
