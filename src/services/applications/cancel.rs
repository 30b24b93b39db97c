use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ApplicationService;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode, applications::entities::ApplicationStatus,
};
use crate::services::{error_response, not_found, unauthorized};

pub async fn cancel_application(
    service: &ApplicationService,
    application_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized());
    };

    let application = match storage.get_application_by_id(application_id).await {
        Ok(Some(application)) if application.user_id == user_id => application,
        Ok(_) => {
            return Ok(not_found(
                ErrorCode::ApplicationNotFound,
                "Application not found",
            ));
        }
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    };

    if !application.status.can_cancel() {
        return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::InvalidStatusTransition,
            format!("Cannot cancel an application that is {}", application.status),
        )));
    }

    match storage
        .update_application_status(application_id, ApplicationStatus::Cancelled, None)
        .await
    {
        Ok(Some(application)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            application,
            "Application cancelled",
        ))),
        Ok(None) => Ok(not_found(
            ErrorCode::ApplicationNotFound,
            "Application not found",
        )),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}
