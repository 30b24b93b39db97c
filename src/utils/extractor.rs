//! 路径参数提取器
//!
//! 在进入处理函数之前校验路径参数，失败时直接返回统一格式的 400 响应。

use actix_web::{
    FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError,
};
use futures_util::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

fn bad_path_param(message: String) -> actix_web::Error {
    let response = HttpResponse::BadRequest().json(ApiResponse::error_empty(
        ErrorCode::InvalidParameter,
        message.clone(),
    ));
    InternalError::from_response(message, response).into()
}

fn parse_positive_id(req: &HttpRequest, name: &str) -> Result<i64, actix_web::Error> {
    let raw = req
        .match_info()
        .get(name)
        .ok_or_else(|| bad_path_param(format!("Missing path parameter: {name}")))?;
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(bad_path_param(format!(
            "Path parameter `{name}` must be a positive integer"
        ))),
    }
}

/// `{id}` 路径参数，保证为正整数
#[derive(Debug, Clone, Copy)]
pub struct SafeIDI64(pub i64);

impl FromRequest for SafeIDI64 {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(parse_positive_id(req, "id").map(SafeIDI64))
    }
}

/// `{order_id}` 路径参数，必须是 UUID
#[derive(Debug, Clone)]
pub struct SafeOrderId(pub String);

impl FromRequest for SafeOrderId {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let result = req
            .match_info()
            .get("order_id")
            .and_then(|raw| uuid::Uuid::parse_str(raw).ok())
            .map(|id| SafeOrderId(id.to_string()))
            .ok_or_else(|| bad_path_param("Path parameter `order_id` must be a UUID".into()));
        ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn test_safe_id_accepts_positive() {
        let req = TestRequest::default()
            .param("id", "42")
            .to_http_request();
        let id = SafeIDI64::extract(&req).await.unwrap();
        assert_eq!(id.0, 42);
    }

    #[actix_web::test]
    async fn test_safe_id_rejects_garbage() {
        for raw in ["0", "-3", "abc", "1.5"] {
            let req = TestRequest::default().param("id", raw).to_http_request();
            assert!(SafeIDI64::extract(&req).await.is_err(), "{raw} should fail");
        }
    }

    #[actix_web::test]
    async fn test_order_id_must_be_uuid() {
        let req = TestRequest::default()
            .param("order_id", "not-a-uuid")
            .to_http_request();
        assert!(SafeOrderId::extract(&req).await.is_err());

        let id = uuid::Uuid::new_v4().to_string();
        let req = TestRequest::default()
            .param("order_id", id.clone())
            .to_http_request();
        assert_eq!(SafeOrderId::extract(&req).await.unwrap().0, id);
    }
}
