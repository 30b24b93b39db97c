use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ApplicationService;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    applications::requests::{ApplicationListParams, ApplicationListQuery},
};
use crate::services::{can_manage, error_response, forbidden, not_found, unauthorized};

pub async fn list_my_applications(
    service: &ApplicationService,
    query: ApplicationListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized());
    };

    let list_query = ApplicationListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        seminar_id: None,
        user_id: Some(user_id),
        status: query.status,
    };

    match storage.list_applications_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Applications retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

/// 商家查看自己研讨会的报名
pub async fn list_seminar_applications(
    service: &ApplicationService,
    seminar_id: i64,
    query: ApplicationListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(user) = RequireJWT::extract_user(request) else {
        return Ok(unauthorized());
    };

    match storage.get_seminar_by_id(seminar_id).await {
        Ok(Some(seminar)) if can_manage(&user, seminar.business_id) => {}
        Ok(Some(_)) => return Ok(forbidden("You do not own this seminar")),
        Ok(None) => return Ok(not_found(ErrorCode::SeminarNotFound, "Seminar not found")),
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    }

    let list_query = ApplicationListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        seminar_id: Some(seminar_id),
        user_id: None,
        status: query.status,
    };

    match storage.list_applications_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Applications retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}
