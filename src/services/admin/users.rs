use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AdminService;
use crate::middlewares::RequireJWT;
use crate::middlewares::require_jwt::user_cache_key;
use crate::models::{
    ApiResponse, ErrorCode,
    users::{
        entities::{UserRole, UserStatus},
        requests::{UpdateUserRequest, UserListParams, UserListQuery},
        responses::UserResponse,
    },
};
use crate::services::{bad_request, error_response, not_found, unauthorized};
use crate::utils::validate::validate_phone;

pub async fn list_users(
    service: &AdminService,
    query: UserListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let list_query = UserListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        role: query.role,
        status: query.status,
        search: query.search,
    };

    match storage.list_users_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Users retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

pub async fn get_user(
    service: &AdminService,
    user_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.get_user_by_id(user_id).await {
        Ok(Some(user)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            UserResponse { user },
            "User retrieved successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::UserNotFound, "User not found")),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

/// 修改角色或状态后使缓存中的用户失效，下次请求重新加载
pub async fn update_user(
    service: &AdminService,
    user_id: i64,
    body: UpdateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(current) = RequireJWT::extract_user(request) else {
        return Ok(unauthorized());
    };

    // 管理员不能把自己降级或停用
    let demotes_self = current.id == user_id
        && (body.role.as_ref().is_some_and(|role| *role != UserRole::Admin)
            || body
                .status
                .as_ref()
                .is_some_and(|status| *status != UserStatus::Active));
    if demotes_self {
        return Ok(bad_request(
            ErrorCode::BadRequest,
            "Administrators cannot demote or deactivate themselves",
        ));
    }

    if let Some(ref phone) = body.phone
        && let Err(msg) = validate_phone(phone)
    {
        return Ok(bad_request(ErrorCode::UserPhoneInvalid, msg));
    }

    match storage.update_user(user_id, body).await {
        Ok(Some(user)) => {
            if let Some(cache) = service.get_cache(request) {
                cache.remove(&user_cache_key(user_id)).await;
            }
            tracing::info!(
                "User {} updated by admin {} (role {}, status {})",
                user.id,
                current.id,
                user.role,
                user.status
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                UserResponse { user },
                "User updated successfully",
            )))
        }
        Ok(None) => Ok(not_found(ErrorCode::UserNotFound, "User not found")),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{body_json, memory_storage, request_as, seed};
    use actix_web::http::StatusCode;

    #[actix_web::test]
    async fn test_admin_updates_role_but_not_own() {
        let storage = memory_storage().await;
        let admin = seed(&storage, "operator", UserRole::Admin).await;
        let member = seed(&storage, "member", UserRole::User).await;
        let service = AdminService::with_storage(storage.clone());
        let request = request_as(&admin);

        let resp = service
            .update_user(
                member.id,
                UpdateUserRequest {
                    role: Some(UserRole::Business),
                    organization: Some("Daechi Academy".to_string()),
                    ..Default::default()
                },
                &request,
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["data"]["user"]["role"], "business");

        let resp = service
            .update_user(
                admin.id,
                UpdateUserRequest {
                    status: Some(UserStatus::Suspended),
                    ..Default::default()
                },
                &request,
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = service.get_user(9_999, &request).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
