use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EnrollmentService;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    enrollments::requests::{EnrollmentListParams, EnrollmentListQuery},
};
use crate::services::{error_response, unauthorized};

pub async fn list_my_enrollments(
    service: &EnrollmentService,
    query: EnrollmentListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized());
    };

    let list_query = EnrollmentListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        user_id: Some(user_id),
        status: query.status,
        item_type: query.item_type,
        business_id: None,
    };

    match storage.list_enrollments_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Enrollments retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}
