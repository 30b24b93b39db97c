use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::BusinessService;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    enrollments::requests::{EnrollmentListParams, EnrollmentListQuery},
};
use crate::services::{error_response, unauthorized};

/// 自己商品的选课记录；管理员看到全部
pub async fn list_business_enrollments(
    service: &BusinessService,
    query: EnrollmentListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(user) = RequireJWT::extract_user(request) else {
        return Ok(unauthorized());
    };

    let list_query = EnrollmentListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        user_id: None,
        status: query.status,
        item_type: query.item_type,
        business_id: super::scoped_business_id(&user, None),
    };

    match storage.list_enrollments_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Enrollments retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}
