use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::PaymentService;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    payments::{
        entities::{Payment, PaymentStatus},
        requests::ConfirmPaymentRequest,
        responses::ConfirmPaymentResponse,
    },
    users::entities::User,
};
use crate::services::{can_manage, error_response, not_found, unauthorized};
use crate::storage::Storage;

/// 按订单号查找本人的订单；别人的订单一律视为不存在
async fn find_own_payment(
    storage: &Arc<dyn Storage>,
    user: &User,
    order_id: &str,
) -> Result<Payment, HttpResponse> {
    match storage.get_payment_by_order_id(order_id).await {
        Ok(Some(payment)) if can_manage(user, payment.user_id) => Ok(payment),
        Ok(_) => Err(not_found(ErrorCode::PaymentNotFound, "Payment not found")),
        Err(e) => Err(error_response(&e, ErrorCode::InternalServerError)),
    }
}

pub async fn confirm_payment(
    service: &PaymentService,
    order_id: &str,
    confirm: ConfirmPaymentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(user) = RequireJWT::extract_user(request) else {
        return Ok(unauthorized());
    };

    if let Err(response) = find_own_payment(&storage, &user, order_id).await {
        return Ok(response);
    }

    match storage.confirm_payment(order_id, confirm.method).await {
        Ok((payment, enrollments)) => {
            tracing::info!(
                "Payment {} confirmed, {} enrollment(s) created",
                payment.order_id,
                enrollments.len()
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                ConfirmPaymentResponse {
                    payment,
                    enrollments,
                },
                "Payment confirmed",
            )))
        }
        Err(e) => Ok(error_response(&e, ErrorCode::PaymentStateConflict)),
    }
}

pub async fn cancel_payment(
    service: &PaymentService,
    order_id: &str,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(user) = RequireJWT::extract_user(request) else {
        return Ok(unauthorized());
    };

    let payment = match find_own_payment(&storage, &user, order_id).await {
        Ok(payment) => payment,
        Err(response) => return Ok(response),
    };

    match storage
        .transition_payment(payment.id, PaymentStatus::Cancelled)
        .await
    {
        Ok(payment) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            payment,
            "Payment cancelled",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::PaymentStateConflict)),
    }
}
