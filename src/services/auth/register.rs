use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::users::{
    entities::UserRole,
    requests::{CreateUserRequest, RegisterRequest},
    responses::UserResponse,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;
use crate::storage::Storage;
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_email, validate_password, validate_phone, validate_username};

use super::AuthService;

pub async fn handle_register(
    service: &AuthService,
    register_request: RegisterRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    // 管理员账号只能由已有管理员分配
    if register_request.role == UserRole::Admin {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "Registering as admin is not allowed",
        )));
    }

    if let Err(response) = validate_register_request(&register_request) {
        return Ok(response);
    }

    // 1. 检查用户名是否已存在
    if let Err(response) = check_username_exists(&storage, &register_request.username).await {
        return Ok(response);
    }

    // 2. 检查邮箱是否已存在
    if let Err(response) = check_email_exists(&storage, &register_request.email).await {
        return Ok(response);
    }

    // 3. 哈希密码
    let mut create_request = CreateUserRequest::from(register_request);
    match hash_password(&create_request.password) {
        Ok(password_hash) => create_request.password = password_hash,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::RegisterFailed,
                    format!("Password hashing failed: {e}"),
                )),
            );
        }
    }

    // 4. 创建用户
    match storage.create_user(create_request).await {
        Ok(user) => {
            tracing::info!("User {} registered as {}", user.username, user.role);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                UserResponse { user },
                "Registration successful",
            )))
        }
        Err(e) => Ok(error_response(&e, ErrorCode::RegisterFailed)),
    }
}

fn validate_register_request(req: &RegisterRequest) -> Result<(), HttpResponse> {
    if let Err(msg) = validate_username(&req.username) {
        return Err(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserNameInvalid, msg)));
    }
    if let Err(msg) = validate_email(&req.email) {
        return Err(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserEmailInvalid, msg)));
    }
    if let Err(msg) = validate_password(&req.password) {
        return Err(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserPasswordInvalid, msg)));
    }
    if let Some(ref phone) = req.phone
        && let Err(msg) = validate_phone(phone)
    {
        return Err(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserPhoneInvalid, msg)));
    }
    Ok(())
}

async fn check_username_exists(
    storage: &Arc<dyn Storage>,
    username: &str,
) -> Result<(), HttpResponse> {
    match storage.get_user_by_username(username).await {
        Ok(Some(_)) => Err(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::UserNameAlreadyExists,
            "Username already exists",
        ))),
        Ok(None) => Ok(()),
        Err(e) => Err(error_response(&e, ErrorCode::RegisterFailed)),
    }
}

async fn check_email_exists(storage: &Arc<dyn Storage>, email: &str) -> Result<(), HttpResponse> {
    match storage.get_user_by_email(email).await {
        Ok(Some(_)) => Err(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::UserEmailAlreadyExists,
            "Email already exists",
        ))),
        Ok(None) => Ok(()),
        Err(e) => Err(error_response(&e, ErrorCode::RegisterFailed)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::LoginRequest;
    use crate::services::test_support::{anonymous_request, body_json, memory_storage};
    use actix_web::http::StatusCode;

    fn register_body(username: &str, role: UserRole) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password: "study2024".to_string(),
            role,
            display_name: Some("Kim".to_string()),
            phone: Some("010-1234-5678".to_string()),
            organization: None,
        }
    }

    #[actix_web::test]
    async fn test_register_then_login() {
        let service = AuthService::with_storage(memory_storage().await);
        let req = anonymous_request();

        let resp = service
            .register(register_body("kimacademy", UserRole::Business), &req)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body = body_json(resp).await;
        assert_eq!(body["data"]["user"]["role"], "business");
        assert!(body["data"]["user"].get("password_hash").is_none());

        let dup = service
            .register(register_body("kimacademy", UserRole::User), &req)
            .await
            .unwrap();
        assert_eq!(dup.status(), StatusCode::CONFLICT);
        assert_eq!(
            body_json(dup).await["code"],
            ErrorCode::UserNameAlreadyExists as i32
        );

        // 邮箱也可以登录
        let resp = service
            .login(
                LoginRequest {
                    username: "kimacademy@example.com".to_string(),
                    password: "study2024".to_string(),
                },
                &req,
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["data"]["token_type"], "Bearer");
        assert!(body["data"]["access_token"].as_str().is_some());

        let wrong = service
            .login(
                LoginRequest {
                    username: "kimacademy".to_string(),
                    password: "wrong-pass1".to_string(),
                },
                &req,
            )
            .await
            .unwrap();
        assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_register_rejects_admin_and_weak_input() {
        let service = AuthService::with_storage(memory_storage().await);
        let req = anonymous_request();

        let admin = service
            .register(register_body("sneaky", UserRole::Admin), &req)
            .await
            .unwrap();
        assert_eq!(admin.status(), StatusCode::FORBIDDEN);

        let mut weak = register_body("student", UserRole::User);
        weak.password = "password".to_string();
        let resp = service.register(weak, &req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(resp).await["code"],
            ErrorCode::UserPasswordInvalid as i32
        );

        let mut bad_phone = register_body("student", UserRole::User);
        bad_phone.phone = Some("12345".to_string());
        let resp = service.register(bad_phone, &req).await.unwrap();
        assert_eq!(
            body_json(resp).await["code"],
            ErrorCode::UserPhoneInvalid as i32
        );
    }
}
