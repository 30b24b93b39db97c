use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CatalogService;
use crate::models::{
    ApiResponse, ErrorCode,
    workbooks::requests::{WorkbookListParams, WorkbookListQuery},
};
use crate::services::{error_response, not_found};

pub async fn list_workbooks(
    service: &CatalogService,
    query: WorkbookListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let list_query = WorkbookListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        search: query.search,
        business_id: query.business_id,
        include_inactive: false,
    };

    match storage.list_workbooks_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Workbooks retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

pub async fn get_workbook(
    service: &CatalogService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.get_workbook_by_id(id).await {
        Ok(Some(workbook)) if workbook.is_active => Ok(HttpResponse::Ok().json(
            ApiResponse::success(workbook, "Workbook retrieved successfully"),
        )),
        Ok(_) => Ok(not_found(ErrorCode::WorkbookNotFound, "Workbook not found")),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}
