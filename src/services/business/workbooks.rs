use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{BusinessService, TITLE_MAX_LENGTH, owned_material, scoped_business_id};
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode, validate_price,
    workbooks::requests::{
        CreateWorkbookRequest, UpdateWorkbookRequest, WorkbookListParams, WorkbookListQuery,
    },
};
use crate::services::{
    bad_request, can_manage, error_response, forbidden, not_found, unauthorized,
};
use crate::utils::validate::validate_title;

fn validate_page_count(page_count: Option<i32>) -> Result<(), HttpResponse> {
    match page_count {
        Some(count) if count <= 0 => Err(bad_request(
            ErrorCode::InvalidParameter,
            "Page count must be positive",
        )),
        _ => Ok(()),
    }
}

pub async fn list_workbooks(
    service: &BusinessService,
    query: WorkbookListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(user) = RequireJWT::extract_user(request) else {
        return Ok(unauthorized());
    };

    let list_query = WorkbookListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        search: query.search,
        business_id: scoped_business_id(&user, query.business_id),
        include_inactive: true,
    };

    match storage.list_workbooks_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Workbooks retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

pub async fn create_workbook(
    service: &BusinessService,
    body: CreateWorkbookRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(user) = RequireJWT::extract_user(request) else {
        return Ok(unauthorized());
    };

    if let Err(msg) = validate_title(&body.title, "Title", TITLE_MAX_LENGTH) {
        return Ok(bad_request(ErrorCode::InvalidParameter, msg));
    }
    if let Err(msg) = validate_price(body.price, body.discount_price) {
        return Ok(bad_request(ErrorCode::InvalidPrice, msg));
    }
    if let Err(response) = validate_page_count(body.page_count) {
        return Ok(response);
    }
    if let Some(material_id) = body.source_material_id
        && let Err(response) = owned_material(&storage, &user, material_id).await
    {
        return Ok(response);
    }

    match storage.create_workbook(user.id, body).await {
        Ok(workbook) => {
            tracing::info!("Workbook {} created by business {}", workbook.id, user.id);
            Ok(HttpResponse::Created().json(ApiResponse::success(workbook, "Workbook created")))
        }
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

pub async fn update_workbook(
    service: &BusinessService,
    id: i64,
    body: UpdateWorkbookRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(user) = RequireJWT::extract_user(request) else {
        return Ok(unauthorized());
    };

    let workbook = match storage.get_workbook_by_id(id).await {
        Ok(Some(workbook)) => workbook,
        Ok(None) => return Ok(not_found(ErrorCode::WorkbookNotFound, "Workbook not found")),
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    };
    if !can_manage(&user, workbook.business_id) {
        return Ok(forbidden("You do not own this workbook"));
    }

    if let Some(ref title) = body.title
        && let Err(msg) = validate_title(title, "Title", TITLE_MAX_LENGTH)
    {
        return Ok(bad_request(ErrorCode::InvalidParameter, msg));
    }
    if let Err(response) = validate_page_count(body.page_count) {
        return Ok(response);
    }

    let price = body.price.unwrap_or(workbook.price);
    let discount_price = if body.clear_discount {
        None
    } else {
        body.discount_price.or(workbook.discount_price)
    };
    if let Err(msg) = validate_price(price, discount_price) {
        return Ok(bad_request(ErrorCode::InvalidPrice, msg));
    }

    match storage.update_workbook(id, body).await {
        Ok(Some(workbook)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            workbook,
            "Workbook updated",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::WorkbookNotFound, "Workbook not found")),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}
