use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ReviewService;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode, ProductRef,
    reviews::{entities::validate_rating, requests::CreateReviewRequest},
};
use crate::services::{bad_request, error_response, unauthorized};

/// 只有正在学习或已完成的用户可以评价
pub async fn create_review(
    service: &ReviewService,
    review: CreateReviewRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized());
    };

    if let Err(msg) = validate_rating(review.rating) {
        return Ok(bad_request(ErrorCode::InvalidParameter, msg));
    }

    let item = ProductRef {
        item_type: review.item_type,
        item_id: review.item_id,
    };

    match storage.find_enrollment(user_id, item).await {
        Ok(Some(enrollment)) if enrollment.status.allows_review() => {}
        Ok(_) => {
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::ReviewNotAllowed,
                "Only enrolled users can review this item",
            )));
        }
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    }

    match storage.create_review(user_id, review).await {
        Ok(review) => Ok(HttpResponse::Created().json(ApiResponse::success(
            review,
            "Review created",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::ReviewAlreadyExists)),
    }
}
