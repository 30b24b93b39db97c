use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EnrollmentService;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    enrollments::{entities::EnrollmentStatus, requests::UpdateProgressRequest},
};
use crate::services::{bad_request, error_response, not_found, unauthorized};

/// 进度 0..=100，达到 100 时自动完成
pub async fn update_progress(
    service: &EnrollmentService,
    enrollment_id: i64,
    update: UpdateProgressRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized());
    };

    if !(0..=100).contains(&update.progress) {
        return Ok(bad_request(
            ErrorCode::InvalidParameter,
            "Progress must be between 0 and 100",
        ));
    }

    match storage.get_enrollment_by_id(enrollment_id).await {
        Ok(Some(enrollment)) if enrollment.user_id == user_id => {
            if enrollment.status == EnrollmentStatus::Cancelled {
                return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                    ErrorCode::InvalidStatusTransition,
                    "Enrollment has been cancelled",
                )));
            }
        }
        Ok(_) => {
            return Ok(not_found(
                ErrorCode::EnrollmentNotFound,
                "Enrollment not found",
            ));
        }
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    }

    match storage
        .update_enrollment_progress(enrollment_id, update.progress)
        .await
    {
        Ok(Some(enrollment)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            enrollment,
            "Progress updated",
        ))),
        Ok(None) => Ok(not_found(
            ErrorCode::EnrollmentNotFound,
            "Enrollment not found",
        )),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::payments::{entities::PaymentLine, requests::NewPayment};
    use crate::models::users::entities::UserRole;
    use crate::models::workbooks::requests::CreateWorkbookRequest;
    use crate::models::ItemType;
    use crate::services::test_support::{body_json, memory_storage, request_as, seed};
    use actix_web::http::StatusCode;

    #[actix_web::test]
    async fn test_progress_owner_range_and_completion() {
        let storage = memory_storage().await;
        let business = seed(&storage, "academy", UserRole::Business).await;
        let student = seed(&storage, "student", UserRole::User).await;
        let other = seed(&storage, "other", UserRole::User).await;
        let workbook = storage
            .create_workbook(
                business.id,
                CreateWorkbookRequest {
                    title: "Vocabulary 3000".to_string(),
                    description: None,
                    price: 10_000,
                    discount_price: None,
                    thumbnail_url: None,
                    page_count: None,
                    source_material_id: None,
                },
            )
            .await
            .unwrap();
        let payment = storage
            .create_payment(NewPayment {
                user_id: student.id,
                order_id: uuid::Uuid::new_v4().to_string(),
                amount: 10_000,
                items: vec![PaymentLine {
                    item_type: ItemType::Workbook,
                    item_id: workbook.id,
                    title: workbook.title.clone(),
                    amount: 10_000,
                }],
            })
            .await
            .unwrap();
        let (_, enrollments) = storage
            .confirm_payment(&payment.order_id, None)
            .await
            .unwrap();
        let enrollment_id = enrollments[0].id;

        let service = EnrollmentService::with_storage(storage);

        let resp = service
            .update_progress(
                enrollment_id,
                UpdateProgressRequest { progress: 150 },
                &request_as(&student),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = service
            .update_progress(
                enrollment_id,
                UpdateProgressRequest { progress: 40 },
                &request_as(&other),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = service
            .update_progress(
                enrollment_id,
                UpdateProgressRequest { progress: 100 },
                &request_as(&student),
            )
            .await
            .unwrap();
        let body = body_json(resp).await;
        assert_eq!(body["data"]["status"], "completed");
        assert_eq!(body["data"]["progress"], 100);
    }
}
