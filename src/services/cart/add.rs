use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{CartService, resolve_product};
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode, ProductRef, cart::requests::AddCartItemRequest};
use crate::services::{bad_request, error_response, not_found, unauthorized};

pub async fn add_item(
    service: &CartService,
    item: AddCartItemRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized());
    };

    let product = ProductRef {
        item_type: item.item_type,
        item_id: item.item_id,
    };

    // 1. 商品必须存在且在售
    match resolve_product(&storage, product).await {
        Ok(Some(resolved)) if resolved.is_active => {}
        Ok(Some(_)) => {
            return Ok(bad_request(ErrorCode::ItemInactive, "Item is not available"));
        }
        Ok(None) => return Ok(not_found(ErrorCode::NotFound, "Item not found")),
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    }

    // 2. 已购买的商品不能再加入
    match storage.find_enrollment(user_id, product).await {
        Ok(Some(enrollment)) if enrollment.status.allows_review() => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::AlreadyEnrolled,
                "Already enrolled in this item",
            )));
        }
        Ok(_) => {}
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    }

    // 3. 加入购物车，重复加入返回冲突
    match storage.add_cart_item(user_id, product).await {
        Ok(cart_item) => Ok(HttpResponse::Created().json(ApiResponse::success(
            cart_item,
            "Item added to cart",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::CartItemAlreadyExists)),
    }
}
