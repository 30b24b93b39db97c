use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ApplicationService;
use crate::errors::EduMarketError;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode, applications::requests::UpdateApplicationStatusRequest,
};
use crate::services::{can_manage, error_response, forbidden, not_found, unauthorized};

/// 商家审核报名；批准时按研讨会名额检查
pub async fn review_application(
    service: &ApplicationService,
    application_id: i64,
    body: UpdateApplicationStatusRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(user) = RequireJWT::extract_user(request) else {
        return Ok(unauthorized());
    };

    let application = match storage.get_application_by_id(application_id).await {
        Ok(Some(application)) => application,
        Ok(None) => {
            return Ok(not_found(
                ErrorCode::ApplicationNotFound,
                "Application not found",
            ));
        }
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    };

    let seminar = match storage.get_seminar_by_id(application.seminar_id).await {
        Ok(Some(seminar)) => seminar,
        Ok(None) => return Ok(not_found(ErrorCode::SeminarNotFound, "Seminar not found")),
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    };

    if !can_manage(&user, seminar.business_id) {
        return Ok(forbidden("You do not own this seminar"));
    }

    if !application.status.can_review_to(body.status) {
        return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::InvalidStatusTransition,
            format!(
                "Cannot change application from {} to {}",
                application.status, body.status
            ),
        )));
    }

    match storage
        .update_application_status(application_id, body.status, seminar.capacity)
        .await
    {
        Ok(Some(updated)) => {
            tracing::info!(
                "Application {} for seminar {} set to {} by user {}",
                updated.id,
                seminar.id,
                updated.status,
                user.id
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                updated,
                "Application status updated",
            )))
        }
        Ok(None) => Ok(not_found(
            ErrorCode::ApplicationNotFound,
            "Application not found",
        )),
        Err(e @ EduMarketError::CapacityExceeded(_)) => {
            Ok(error_response(&e, ErrorCode::SeminarFull))
        }
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::applications::{
        entities::ApplicationStatus, requests::ApplyRequest,
    };
    use crate::models::seminars::{entities::SeminarKind, requests::NewSeminar};
    use crate::models::users::entities::UserRole;
    use crate::services::test_support::{body_json, memory_storage, request_as, seed};
    use actix_web::http::StatusCode;

    #[actix_web::test]
    async fn test_application_flow_with_capacity() {
        let storage = memory_storage().await;
        let host = seed(&storage, "academy", UserRole::Business).await;
        let rival = seed(&storage, "rival", UserRole::Business).await;
        let first = seed(&storage, "first", UserRole::User).await;
        let second = seed(&storage, "second", UserRole::User).await;

        let seminar = storage
            .create_seminar(NewSeminar {
                business_id: host.id,
                kind: SeminarKind::Event,
                title: "Speaking clinic".to_string(),
                description: None,
                location: Some("Gangnam".to_string()),
                starts_at: None,
                capacity: Some(1),
                price: 0,
                source_material_id: None,
                analysis_json: None,
            })
            .await
            .unwrap();

        let service = ApplicationService::with_storage(storage.clone());
        let seminar_id = seminar.id;
        let apply = |request: HttpRequest| {
            let service = &service;
            async move {
                service
                    .apply(seminar_id, ApplyRequest::default(), &request)
                    .await
                    .unwrap()
            }
        };

        let resp = apply(request_as(&first)).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let first_app = body_json(resp).await["data"]["id"].as_i64().unwrap();
        assert_eq!(apply(request_as(&first)).await.status(), StatusCode::CONFLICT);
        let resp = apply(request_as(&second)).await;
        let second_app = body_json(resp).await["data"]["id"].as_i64().unwrap();

        let approve = || UpdateApplicationStatusRequest {
            status: ApplicationStatus::Approved,
        };

        let resp = service
            .review_application(first_app, approve(), &request_as(&rival))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let resp = service
            .review_application(first_app, approve(), &request_as(&host))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = service
            .review_application(second_app, approve(), &request_as(&host))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        assert_eq!(body_json(resp).await["code"], ErrorCode::SeminarFull as i32);

        // 取消后名额释放
        let resp = service
            .cancel_application(first_app, &request_as(&first))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let resp = service
            .cancel_application(first_app, &request_as(&first))
            .await
            .unwrap();
        assert_eq!(
            body_json(resp).await["code"],
            ErrorCode::InvalidStatusTransition as i32
        );

        let resp = service
            .review_application(second_app, approve(), &request_as(&host))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
