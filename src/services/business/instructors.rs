use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{BusinessService, TITLE_MAX_LENGTH, scoped_business_id};
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    instructors::requests::{
        CreateInstructorRequest, InstructorListParams, InstructorListQuery,
        UpdateInstructorRequest,
    },
};
use crate::services::{
    bad_request, can_manage, error_response, forbidden, not_found, unauthorized,
};
use crate::utils::validate::validate_title;

pub async fn list_instructors(
    service: &BusinessService,
    query: InstructorListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(user) = RequireJWT::extract_user(request) else {
        return Ok(unauthorized());
    };

    let list_query = InstructorListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        business_id: scoped_business_id(&user, query.business_id),
        search: query.search,
        include_inactive: true,
    };

    match storage.list_instructors_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Instructors retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

pub async fn create_instructor(
    service: &BusinessService,
    body: CreateInstructorRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(user) = RequireJWT::extract_user(request) else {
        return Ok(unauthorized());
    };

    if let Err(msg) = validate_title(&body.name, "Name", TITLE_MAX_LENGTH) {
        return Ok(bad_request(ErrorCode::InvalidParameter, msg));
    }

    match storage.create_instructor(user.id, body).await {
        Ok(instructor) => Ok(HttpResponse::Created().json(ApiResponse::success(
            instructor,
            "Instructor created",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

/// 也用于停用（is_active = false）
pub async fn update_instructor(
    service: &BusinessService,
    id: i64,
    body: UpdateInstructorRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(user) = RequireJWT::extract_user(request) else {
        return Ok(unauthorized());
    };

    match storage.get_instructor_by_id(id).await {
        Ok(Some(instructor)) if can_manage(&user, instructor.business_id) => {}
        Ok(Some(_)) => return Ok(forbidden("You do not own this instructor")),
        Ok(None) => return Ok(not_found(ErrorCode::InstructorNotFound, "Instructor not found")),
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    }

    if let Some(ref name) = body.name
        && let Err(msg) = validate_title(name, "Name", TITLE_MAX_LENGTH)
    {
        return Ok(bad_request(ErrorCode::InvalidParameter, msg));
    }

    match storage.update_instructor(id, body).await {
        Ok(Some(instructor)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            instructor,
            "Instructor updated",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::InstructorNotFound, "Instructor not found")),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}
