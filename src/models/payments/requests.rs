use super::entities::PaymentStatus;
use crate::models::common::{PaginationQuery, ProductRef};
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/payment.ts")]
pub struct CheckoutRequest {
    /// 为空时结算整个购物车
    pub items: Option<Vec<ProductRef>>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/payment.ts")]
pub struct ConfirmPaymentRequest {
    pub method: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/payment.ts")]
pub struct UpdatePaymentStatusRequest {
    pub status: PaymentStatus,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/payment.ts")]
pub struct PaymentListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub status: Option<PaymentStatus>,
    pub user_id: Option<i64>,
}

// 存储层创建订单参数
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub user_id: i64,
    pub order_id: String,
    pub amount: i64,
    pub items: Vec<super::entities::PaymentLine>,
}

#[derive(Debug, Clone, Default)]
pub struct PaymentListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub status: Option<PaymentStatus>,
    pub user_id: Option<i64>,
}
