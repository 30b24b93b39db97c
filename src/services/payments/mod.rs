pub mod admin;
pub mod checkout;
pub mod confirm;
pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::payments::requests::{
    CheckoutRequest, ConfirmPaymentRequest, PaymentListParams, UpdatePaymentStatusRequest,
};
use crate::storage::Storage;

pub struct PaymentService {
    storage: Option<Arc<dyn Storage>>,
}

impl PaymentService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    #[cfg(test)]
    pub(crate) fn with_storage(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage: Some(storage),
        }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        super::resolve_storage(self.storage.as_ref(), request)
    }

    // 创建待支付订单
    pub async fn checkout(
        &self,
        checkout: CheckoutRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        checkout::checkout(self, checkout, request).await
    }

    // 确认支付
    pub async fn confirm_payment(
        &self,
        order_id: &str,
        confirm: ConfirmPaymentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        confirm::confirm_payment(self, order_id, confirm, request).await
    }

    // 取消待支付订单
    pub async fn cancel_payment(
        &self,
        order_id: &str,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        confirm::cancel_payment(self, order_id, request).await
    }

    // 当前用户的支付记录
    pub async fn list_my_payments(
        &self,
        query: PaymentListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_my_payments(self, query, request).await
    }

    // 管理员：全部支付记录
    pub async fn list_all_payments(
        &self,
        query: PaymentListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        admin::list_all_payments(self, query, request).await
    }

    // 管理员：退款或标记失败
    pub async fn update_payment_status(
        &self,
        payment_id: i64,
        update: UpdatePaymentStatusRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        admin::update_payment_status(self, payment_id, update, request).await
    }
}
