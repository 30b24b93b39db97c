use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::ReviewService;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    reviews::{
        entities::{Review, validate_rating},
        requests::UpdateReviewRequest,
    },
};
use crate::services::{bad_request, error_response, not_found, unauthorized};
use crate::storage::Storage;

async fn find_own_review(
    storage: &Arc<dyn Storage>,
    user_id: i64,
    review_id: i64,
) -> Result<Review, HttpResponse> {
    match storage.get_review_by_id(review_id).await {
        Ok(Some(review)) if review.user_id == user_id && review.is_active => Ok(review),
        Ok(_) => Err(not_found(ErrorCode::ReviewNotFound, "Review not found")),
        Err(e) => Err(error_response(&e, ErrorCode::InternalServerError)),
    }
}

pub async fn update_review(
    service: &ReviewService,
    review_id: i64,
    update: UpdateReviewRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized());
    };

    if let Some(rating) = update.rating
        && let Err(msg) = validate_rating(rating)
    {
        return Ok(bad_request(ErrorCode::InvalidParameter, msg));
    }

    if let Err(response) = find_own_review(&storage, user_id, review_id).await {
        return Ok(response);
    }

    match storage.update_review(review_id, update).await {
        Ok(Some(review)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            review,
            "Review updated",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::ReviewNotFound, "Review not found")),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

// 软删除
pub async fn delete_review(
    service: &ReviewService,
    review_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized());
    };

    if let Err(response) = find_own_review(&storage, user_id, review_id).await {
        return Ok(response);
    }

    match storage.deactivate_review(review_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Review deleted"))),
        Ok(false) => Ok(not_found(ErrorCode::ReviewNotFound, "Review not found")),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::courses::requests::CreateCourseRequest;
    use crate::models::payments::{entities::PaymentLine, requests::NewPayment};
    use crate::models::reviews::requests::CreateReviewRequest;
    use crate::models::users::entities::UserRole;
    use crate::models::{ItemType, ProductRef};
    use crate::services::test_support::{body_json, memory_storage, request_as, seed};
    use actix_web::http::StatusCode;

    fn review(item_id: i64, rating: i32) -> CreateReviewRequest {
        CreateReviewRequest {
            item_type: ItemType::Course,
            item_id,
            rating,
            content: Some("Clear explanations".to_string()),
        }
    }

    #[actix_web::test]
    async fn test_review_requires_enrollment_and_ownership() {
        let storage = memory_storage().await;
        let business = seed(&storage, "academy", UserRole::Business).await;
        let student = seed(&storage, "student", UserRole::User).await;
        let visitor = seed(&storage, "visitor", UserRole::User).await;
        let course = storage
            .create_course(
                business.id,
                CreateCourseRequest {
                    title: "IELTS Writing".to_string(),
                    description: None,
                    category: Some("ielts".to_string()),
                    level: None,
                    price: 80_000,
                    discount_price: None,
                    thumbnail_url: None,
                    instructor_id: None,
                    source_material_id: None,
                },
            )
            .await
            .unwrap();
        let payment = storage
            .create_payment(NewPayment {
                user_id: student.id,
                order_id: uuid::Uuid::new_v4().to_string(),
                amount: 80_000,
                items: vec![PaymentLine {
                    item_type: ItemType::Course,
                    item_id: course.id,
                    title: course.title.clone(),
                    amount: 80_000,
                }],
            })
            .await
            .unwrap();
        storage
            .confirm_payment(&payment.order_id, None)
            .await
            .unwrap();

        let service = ReviewService::with_storage(storage.clone());

        let resp = service
            .create_review(review(course.id, 5), &request_as(&visitor))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_json(resp).await["code"], ErrorCode::ReviewNotAllowed as i32);

        let resp = service
            .create_review(review(course.id, 6), &request_as(&student))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = service
            .create_review(review(course.id, 4), &request_as(&student))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let review_id = body_json(resp).await["data"]["id"].as_i64().unwrap();

        let resp = service
            .create_review(review(course.id, 3), &request_as(&student))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let resp = service
            .delete_review(review_id, &request_as(&visitor))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = service
            .delete_review(review_id, &request_as(&student))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let listed = storage
            .list_item_reviews(
                ProductRef {
                    item_type: ItemType::Course,
                    item_id: course.id,
                },
                None,
                None,
            )
            .await
            .unwrap();
        assert_eq!(listed.review_count, 0);
        assert!(listed.average_rating.is_none());
    }
}
