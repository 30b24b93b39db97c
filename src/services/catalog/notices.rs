use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CatalogService;
use crate::models::{
    ApiResponse, ErrorCode,
    notices::requests::{NoticeListParams, NoticeListQuery},
};
use crate::services::{error_response, not_found};

// 置顶公告排在最前
pub async fn list_notices(
    service: &CatalogService,
    query: NoticeListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let list_query = NoticeListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        search: query.search,
        include_inactive: false,
    };

    match storage.list_notices_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Notices retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

pub async fn get_notice(
    service: &CatalogService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.get_notice_by_id(id).await {
        Ok(Some(notice)) if notice.is_active => Ok(HttpResponse::Ok().json(
            ApiResponse::success(notice, "Notice retrieved successfully"),
        )),
        Ok(_) => Ok(not_found(ErrorCode::NoticeNotFound, "Notice not found")),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}
