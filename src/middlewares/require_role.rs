//! 角色访问控制
//!
//! 依赖 [`RequireJWT`](super::RequireJWT) 写入请求扩展的用户，必须挂在它的内层：
//!
//! ```rust,ignore
//! web::scope("/api/v1/business")
//!     .wrap(RequireJWT)
//!     .service(
//!         web::scope("")
//!             .wrap(RequireRole::new_any(UserRole::business_roles()))
//!             .route("/courses", web::get().to(list_courses)),
//!     )
//! ```
//!
//! 角色不符返回 403，缺少用户（未经过 JWT 校验）返回 401。

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::info;

use crate::models::{
    ErrorCode,
    users::entities::{self, UserRole},
};

use super::create_error_response;

#[derive(Clone)]
pub struct RequireRole {
    allowed_roles: Vec<UserRole>,
}

impl RequireRole {
    /// 创建需要特定角色的中间件
    pub fn new(role: &UserRole) -> Self {
        Self {
            allowed_roles: vec![role.clone()],
        }
    }

    /// 创建需要任一角色的中间件
    pub fn new_any(roles: &[&UserRole]) -> Self {
        Self {
            allowed_roles: roles.iter().map(|r| (*r).clone()).collect(),
        }
    }

    fn allows(allowed_roles: &[UserRole], role: &UserRole) -> bool {
        allowed_roles.iter().any(|r| r == role)
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service: Rc::new(service),
            allowed_roles: self.allowed_roles.clone(),
        }))
    }
}

pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    allowed_roles: Vec<UserRole>,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
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
        let allowed_roles = self.allowed_roles.clone();

        Box::pin(async move {
            let user = req.extensions().get::<entities::User>().cloned();

            match user {
                Some(user) if RequireRole::allows(&allowed_roles, &user.role) => {
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Some(user) => {
                    info!(
                        "Access denied for user {} (role: {}). Allowed roles: {:?}",
                        user.id, user.role, allowed_roles
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::FORBIDDEN,
                            ErrorCode::Forbidden,
                            "Access denied.",
                        )
                        .map_into_right_body(),
                    ))
                }
                None => {
                    info!(
                        "Role check failed: no user found in request. Make sure RequireJWT middleware is applied first."
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            "Authentication required",
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test as actix_test;
    use actix_web::{App, HttpResponse, web};

    fn user_with(role: UserRole) -> entities::User {
        entities::User {
            id: 7,
            username: "academy".to_string(),
            email: "academy@example.com".to_string(),
            password_hash: String::new(),
            role,
            status: entities::UserStatus::Active,
            display_name: None,
            phone: None,
            organization: None,
            last_login: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_role_groups() {
        let business = RequireRole::new_any(UserRole::business_roles());
        assert!(RequireRole::allows(&business.allowed_roles, &UserRole::Business));
        assert!(RequireRole::allows(&business.allowed_roles, &UserRole::Admin));
        assert!(!RequireRole::allows(&business.allowed_roles, &UserRole::User));

        let admin = RequireRole::new(&UserRole::Admin);
        assert!(!RequireRole::allows(&admin.allowed_roles, &UserRole::Business));
    }

    #[actix_web::test]
    async fn test_middleware_statuses() {
        let app = actix_test::init_service(
            App::new().service(
                web::scope("/admin")
                    .wrap(RequireRole::new_any(UserRole::admin_roles()))
                    .route("/ping", web::get().to(HttpResponse::Ok)),
            ),
        )
        .await;

        let anonymous = actix_test::TestRequest::get().uri("/admin/ping").to_request();
        let resp = actix_test::call_service(&app, anonymous).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let business = actix_test::TestRequest::get().uri("/admin/ping").to_request();
        business.extensions_mut().insert(user_with(UserRole::Business));
        let resp = actix_test::call_service(&app, business).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let admin = actix_test::TestRequest::get().uri("/admin/ping").to_request();
        admin.extensions_mut().insert(user_with(UserRole::Admin));
        let resp = actix_test::call_service(&app, admin).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
