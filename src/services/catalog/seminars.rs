use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CatalogService;
use crate::models::{
    ApiResponse, ErrorCode,
    seminars::requests::{SeminarListParams, SeminarListQuery},
};
use crate::services::{error_response, not_found};

pub async fn list_seminars(
    service: &CatalogService,
    query: SeminarListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let list_query = SeminarListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        kind: query.kind,
        search: query.search,
        business_id: query.business_id,
        include_inactive: false,
    };

    match storage.list_seminars_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Seminars retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

/// analysis 类型的研讨会附带解析后的分析文档
pub async fn get_seminar(
    service: &CatalogService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.get_seminar_by_id(id).await {
        Ok(Some(seminar)) if seminar.is_active => Ok(HttpResponse::Ok().json(
            ApiResponse::success(seminar, "Seminar retrieved successfully"),
        )),
        Ok(_) => Ok(not_found(ErrorCode::SeminarNotFound, "Seminar not found")),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}
