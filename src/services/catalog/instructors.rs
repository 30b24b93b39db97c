use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CatalogService;
use crate::models::{
    ApiResponse, ErrorCode,
    instructors::requests::{InstructorListParams, InstructorListQuery},
};
use crate::services::{error_response, not_found};

pub async fn list_instructors(
    service: &CatalogService,
    query: InstructorListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let list_query = InstructorListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        business_id: query.business_id,
        search: query.search,
        include_inactive: false,
    };

    match storage.list_instructors_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Instructors retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

pub async fn get_instructor(
    service: &CatalogService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.get_instructor_by_id(id).await {
        Ok(Some(instructor)) if instructor.is_active => Ok(HttpResponse::Ok().json(
            ApiResponse::success(instructor, "Instructor retrieved successfully"),
        )),
        Ok(_) => Ok(not_found(ErrorCode::InstructorNotFound, "Instructor not found")),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}
