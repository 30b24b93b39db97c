use super::entities::Payment;
use crate::models::common::PaginationInfo;
use crate::models::enrollments::entities::Enrollment;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/payment.ts")]
pub struct PaymentListResponse {
    pub items: Vec<Payment>,
    pub pagination: PaginationInfo,
}

// 确认支付后返回订单和新建的选课记录
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/payment.ts")]
pub struct ConfirmPaymentResponse {
    pub payment: Payment,
    pub enrollments: Vec<Enrollment>,
}
