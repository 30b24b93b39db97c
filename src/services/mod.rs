pub mod admin;
pub mod applications;
pub mod auth;
pub mod business;
pub mod cart;
pub mod catalog;
pub mod chat;
pub mod enrollments;
pub mod materials;
pub mod payments;
pub mod reviews;

pub use admin::AdminService;
pub use applications::ApplicationService;
pub use auth::AuthService;
pub use business::BusinessService;
pub use cart::CartService;
pub use catalog::CatalogService;
pub use chat::ChatService;
pub use enrollments::EnrollmentService;
pub use materials::MaterialService;
pub use payments::PaymentService;
pub use reviews::ReviewService;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::errors::EduMarketError;
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

/// 优先使用服务自带的存储，否则从 app_data 读取
pub(crate) fn resolve_storage(
    storage: Option<&Arc<dyn Storage>>,
    request: &HttpRequest,
) -> ActixResult<Arc<dyn Storage>> {
    if let Some(storage) = storage {
        return Ok(storage.clone());
    }
    request
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("Storage not configured"))
}

/// 存储层错误转换为 HTTP 响应；`code` 用于可预期的业务错误
pub(crate) fn error_response(err: &EduMarketError, code: ErrorCode) -> HttpResponse {
    let body = ApiResponse::error_empty(code, err.message());
    match err {
        EduMarketError::NotFound(_) => HttpResponse::NotFound().json(body),
        EduMarketError::Conflict(_) | EduMarketError::CapacityExceeded(_) => {
            HttpResponse::Conflict().json(body)
        }
        EduMarketError::Validation(_) => HttpResponse::BadRequest().json(body),
        EduMarketError::Authentication(_) => HttpResponse::Unauthorized().json(body),
        EduMarketError::Authorization(_) => HttpResponse::Forbidden().json(body),
        EduMarketError::Upstream(_) => HttpResponse::BadGateway().json(body),
        EduMarketError::AnalysisRejected(_) => HttpResponse::UnprocessableEntity().json(body),
        _ => {
            tracing::error!("{}", err);
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                err.format_simple(),
            ))
        }
    }
}

pub(crate) fn unauthorized() -> HttpResponse {
    HttpResponse::Unauthorized().json(ApiResponse::error_empty(
        ErrorCode::Unauthorized,
        "Authentication required",
    ))
}

pub(crate) fn forbidden(message: &str) -> HttpResponse {
    HttpResponse::Forbidden().json(ApiResponse::error_empty(
        ErrorCode::ContentPermissionDenied,
        message,
    ))
}

pub(crate) fn bad_request(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(code, message))
}

pub(crate) fn not_found(code: ErrorCode, message: &str) -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(code, message))
}

/// 管理员或行的所有者
pub(crate) fn can_manage(user: &User, owner_id: i64) -> bool {
    user.is_admin() || user.id == owner_id
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::models::users::{entities::UserRole, requests::CreateUserRequest};
    use crate::storage::sea_orm_storage::SeaOrmStorage;
    use actix_web::HttpMessage;
    use actix_web::test::TestRequest;

    pub async fn memory_storage() -> Arc<dyn Storage> {
        Arc::new(SeaOrmStorage::in_memory().await)
    }

    /// 模拟经过 RequireJWT 之后的请求
    pub fn request_as(user: &User) -> HttpRequest {
        let request = TestRequest::default().to_http_request();
        request.extensions_mut().insert(user.clone());
        request
    }

    pub fn anonymous_request() -> HttpRequest {
        TestRequest::default().to_http_request()
    }

    pub async fn body_json(response: HttpResponse) -> serde_json::Value {
        let bytes = actix_web::body::to_bytes(response.into_body())
            .await
            .expect("response body should be readable");
        serde_json::from_slice(&bytes).expect("response body should be JSON")
    }

    pub async fn seed(storage: &Arc<dyn Storage>, username: &str, role: UserRole) -> User {
        storage
            .create_user(CreateUserRequest {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                password: "not-a-real-hash".to_string(),
                role,
                display_name: None,
                phone: None,
                organization: None,
            })
            .await
            .expect("seed user")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_error_response_status_mapping() {
        let cases = [
            (EduMarketError::not_found("x"), StatusCode::NOT_FOUND),
            (EduMarketError::conflict("x"), StatusCode::CONFLICT),
            (EduMarketError::capacity_exceeded("x"), StatusCode::CONFLICT),
            (EduMarketError::validation("x"), StatusCode::BAD_REQUEST),
            (EduMarketError::upstream("x"), StatusCode::BAD_GATEWAY),
            (
                EduMarketError::database_operation("x"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(error_response(&err, ErrorCode::BadRequest).status(), status);
        }
    }
}
