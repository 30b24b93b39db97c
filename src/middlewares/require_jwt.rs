//! JWT 认证中间件
//!
//! 读取 `Authorization: Bearer <token>`，按 token 中的用户 ID 读缓存（未命中查库），
//! 把 [`entities::User`] 写入请求扩展。令牌缺失、无效或用户非 active 时返回 401。
//!
//! 处理函数通过 [`RequireJWT::extract_user`] 取得当前用户：
//!
//! ```rust,ignore
//! async fn my_cart(req: HttpRequest) -> ActixResult<HttpResponse> {
//!     let Some(user) = RequireJWT::extract_user(&req) else {
//!         return Ok(unauthorized());
//!     };
//!     // ...
//! }
//! ```
//!
//! 浏览器 WebSocket 无法设置请求头，聊天握手直接调用 [`authenticate_token`]。

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::models::{ErrorCode, users::entities};
use crate::storage::Storage;
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, info};

use super::create_error_response;

const BEARER_PREFIX: &str = "Bearer ";
const AUTHORIZATION_HEADER: &str = "Authorization";

#[derive(Clone)]
pub struct RequireJWT;

/// 用户缓存键，管理员修改用户后需要按此键失效
pub fn user_cache_key(user_id: i64) -> String {
    format!("user:{user_id}")
}

/// 校验 access token 并加载当前用户
pub async fn authenticate_token(
    token: &str,
    storage: &Arc<dyn Storage>,
    cache: &Arc<dyn ObjectCache>,
) -> Result<entities::User, String> {
    let claims = crate::utils::jwt::JwtUtils::verify_token(token).map_err(|err| {
        info!("JWT token validation failed: {}", err);
        "Invalid JWT token".to_string()
    })?;

    let user_id = claims
        .user_id()
        .ok_or_else(|| "Invalid user ID in JWT".to_string())?;
    let cache_key = user_cache_key(user_id);

    // 从缓存中获取用户信息
    let cached = match cache.get_raw(&cache_key).await {
        CacheResult::Found(json) => match serde_json::from_str::<entities::User>(&json) {
            Ok(user) => Some(user),
            Err(_) => {
                cache.remove(&cache_key).await;
                info!("Failed to deserialize cached user {}", user_id);
                None
            }
        },
        _ => None,
    };

    let user = match cached {
        Some(user) => user,
        None => {
            let user = storage
                .get_user_by_id(user_id)
                .await
                .map_err(|_| "Failed to retrieve user from storage".to_string())?
                .ok_or_else(|| "User not found".to_string())?;

            if let Ok(user_json) = serde_json::to_string(&user) {
                cache
                    .insert_raw(cache_key, user_json, AppConfig::get().cache.default_ttl)
                    .await;
            }
            user
        }
    };

    if user.status != entities::UserStatus::Active {
        return Err("User is not active".to_string());
    }

    Ok(user)
}

// 辅助函数：从请求头提取 JWT 并验证
async fn extract_and_validate_jwt(req: &ServiceRequest) -> Result<entities::User, String> {
    let token = req
        .headers()
        .get(AUTHORIZATION_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .ok_or_else(|| "Missing or invalid Authorization header".to_string())?;

    let cache = req
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .ok_or_else(|| "Cache not configured".to_string())?
        .get_ref()
        .clone();
    let storage = req
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .ok_or_else(|| "Storage not configured".to_string())?
        .get_ref()
        .clone();

    authenticate_token(token, &storage, &cache).await
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
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
        Box::pin(async move {
            // 处理 OPTIONS 请求
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(
                    create_error_response(StatusCode::NO_CONTENT, ErrorCode::Success, "")
                        .map_into_right_body(),
                ));
            }

            match extract_and_validate_jwt(&req).await {
                Ok(user) => {
                    debug!("JWT authentication successful for ID: {}", user.id);
                    req.extensions_mut().insert(user);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(err) => {
                    info!(
                        "JWT authentication failed for request to {}: {}",
                        req.path(),
                        err
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            &format!("Unauthorized: {err}"),
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

// 辅助函数：从请求中提取用户信息
impl RequireJWT {
    /// 从请求扩展中提取当前用户
    /// 此函数应该在应用了RequireJWT中间件的路由处理程序中使用
    pub fn extract_user(req: &actix_web::HttpRequest) -> Option<entities::User> {
        req.extensions().get::<entities::User>().cloned()
    }

    /// 从请求扩展中提取用户ID
    pub fn extract_user_id(req: &actix_web::HttpRequest) -> Option<i64> {
        req.extensions().get::<entities::User>().map(|user| user.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::object_cache::moka::MokaCacheWrapper;
    use crate::models::users::{entities::UserStatus, requests::UpdateUserRequest};
    use crate::services::test_support::{memory_storage, seed};
    use crate::utils::jwt::JwtUtils;

    #[actix_web::test]
    async fn test_authenticate_token_uses_cache_and_status() {
        let storage = memory_storage().await;
        let cache: Arc<dyn ObjectCache> = Arc::new(MokaCacheWrapper::with_capacity(100, 60));
        let user = seed(&storage, "student", entities::UserRole::User).await;
        let token = JwtUtils::generate_access_token(user.id, "user").unwrap();

        let loaded = authenticate_token(&token, &storage, &cache).await.unwrap();
        assert_eq!(loaded.id, user.id);
        assert!(matches!(
            cache.get_raw(&user_cache_key(user.id)).await,
            CacheResult::Found(_)
        ));

        assert!(authenticate_token("not-a-jwt", &storage, &cache).await.is_err());

        // 停用后缓存仍是旧数据，失效缓存后才会被拒绝
        storage
            .update_user(
                user.id,
                UpdateUserRequest {
                    status: Some(UserStatus::Suspended),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(authenticate_token(&token, &storage, &cache).await.is_ok());
        cache.remove(&user_cache_key(user.id)).await;
        assert_eq!(
            authenticate_token(&token, &storage, &cache).await.unwrap_err(),
            "User is not active"
        );
    }
}
