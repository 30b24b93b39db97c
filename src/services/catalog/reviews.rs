use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CatalogService;
use crate::models::{ApiResponse, ErrorCode, ProductRef, reviews::requests::ReviewListParams};
use crate::services::error_response;

pub async fn list_reviews(
    service: &CatalogService,
    query: ReviewListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let item = ProductRef {
        item_type: query.item_type,
        item_id: query.item_id,
    };

    match storage
        .list_item_reviews(
            item,
            Some(query.pagination.page),
            Some(query.pagination.size),
        )
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Reviews retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}
