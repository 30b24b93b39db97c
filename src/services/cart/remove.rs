use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CartService;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{error_response, not_found, unauthorized};

pub async fn remove_item(
    service: &CartService,
    cart_item_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized());
    };

    match storage.remove_cart_item(user_id, cart_item_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Item removed from cart",
        ))),
        Ok(false) => Ok(not_found(ErrorCode::CartItemNotFound, "Cart item not found")),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

pub async fn clear_cart(service: &CartService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized());
    };

    match storage.clear_cart(user_id).await {
        Ok(removed) => {
            tracing::debug!("Cleared {} cart item(s) for user {}", removed, user_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Cart cleared")))
        }
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}
