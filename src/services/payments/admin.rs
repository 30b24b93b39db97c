use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::PaymentService;
use crate::models::{
    ApiResponse, ErrorCode,
    payments::{
        entities::PaymentStatus,
        requests::{PaymentListParams, PaymentListQuery, UpdatePaymentStatusRequest},
    },
};
use crate::services::{bad_request, error_response};

pub async fn list_all_payments(
    service: &PaymentService,
    query: PaymentListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let list_query = PaymentListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        status: query.status,
        user_id: query.user_id,
    };

    match storage.list_payments_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Payments retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

/// 管理员只能退款（paid -> refunded）或标记失败（pending -> failed）
pub async fn update_payment_status(
    service: &PaymentService,
    payment_id: i64,
    update: UpdatePaymentStatusRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    if !matches!(update.status, PaymentStatus::Refunded | PaymentStatus::Failed) {
        return Ok(bad_request(
            ErrorCode::InvalidStatusTransition,
            "Admins may only set a payment to refunded or failed",
        ));
    }

    match storage.transition_payment(payment_id, update.status).await {
        Ok(payment) => {
            tracing::warn!(
                "Payment {} changed to {} by admin",
                payment.order_id,
                payment.status
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                payment,
                "Payment status updated",
            )))
        }
        Err(e) => Ok(error_response(&e, ErrorCode::PaymentStateConflict)),
    }
}
