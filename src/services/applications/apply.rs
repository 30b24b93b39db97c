use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ApplicationService;
use crate::errors::EduMarketError;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode, applications::requests::ApplyRequest};
use crate::services::{error_response, not_found, unauthorized};

pub(super) const MAX_MESSAGE_LENGTH: usize = 1000;

pub async fn apply(
    service: &ApplicationService,
    seminar_id: i64,
    body: ApplyRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized());
    };

    if let Some(ref message) = body.message
        && message.chars().count() > MAX_MESSAGE_LENGTH
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::InvalidParameter,
            format!("Message must be at most {MAX_MESSAGE_LENGTH} characters"),
        )));
    }

    match storage.get_seminar_by_id(seminar_id).await {
        Ok(Some(seminar)) if seminar.is_active => {}
        Ok(_) => return Ok(not_found(ErrorCode::SeminarNotFound, "Seminar not found")),
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    }

    let message = body
        .message
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty());

    match storage.create_application(seminar_id, user_id, message).await {
        Ok(application) => Ok(HttpResponse::Created().json(ApiResponse::success(
            application,
            "Application submitted",
        ))),
        Err(e @ EduMarketError::CapacityExceeded(_)) => {
            Ok(error_response(&e, ErrorCode::SeminarFull))
        }
        Err(e @ EduMarketError::Conflict(_)) => {
            Ok(error_response(&e, ErrorCode::ApplicationAlreadyExists))
        }
        Err(e) => Ok(error_response(&e, ErrorCode::SeminarNotFound)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::applications::entities::ApplicationStatus;
    use crate::models::seminars::{entities::SeminarKind, requests::NewSeminar};
    use crate::models::users::entities::UserRole;
    use crate::services::test_support::{body_json, memory_storage, request_as, seed};
    use actix_web::http::StatusCode;

    #[actix_web::test]
    async fn test_apply_conflicts_map_to_distinct_codes() {
        let storage = memory_storage().await;
        let host = seed(&storage, "academy", UserRole::Business).await;
        let first = seed(&storage, "first", UserRole::User).await;
        let late = seed(&storage, "late", UserRole::User).await;

        let seminar = storage
            .create_seminar(NewSeminar {
                business_id: host.id,
                kind: SeminarKind::Event,
                title: "Essay workshop".to_string(),
                description: None,
                location: None,
                starts_at: None,
                capacity: Some(1),
                price: 0,
                source_material_id: None,
                analysis_json: None,
            })
            .await
            .unwrap();
        let service = ApplicationService::with_storage(storage.clone());

        let resp = service
            .apply(seminar.id, ApplyRequest::default(), &request_as(&first))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let application_id = body_json(resp).await["data"]["id"].as_i64().unwrap();

        let resp = service
            .apply(seminar.id, ApplyRequest::default(), &request_as(&first))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        assert_eq!(
            body_json(resp).await["code"],
            ErrorCode::ApplicationAlreadyExists as i32
        );

        storage
            .update_application_status(application_id, ApplicationStatus::Approved, Some(1))
            .await
            .unwrap();

        let resp = service
            .apply(seminar.id, ApplyRequest::default(), &request_as(&late))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        assert_eq!(body_json(resp).await["code"], ErrorCode::SeminarFull as i32);
    }

    #[actix_web::test]
    async fn test_overlong_message_is_rejected() {
        let storage = memory_storage().await;
        let student = seed(&storage, "student", UserRole::User).await;
        let service = ApplicationService::with_storage(storage);

        let body = ApplyRequest {
            message: Some("a".repeat(MAX_MESSAGE_LENGTH + 1)),
        };
        let resp = service.apply(1, body, &request_as(&student)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
