use super::entities::EnrollmentStatus;
use crate::models::common::{ItemType, PaginationQuery};
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct EnrollmentListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub status: Option<EnrollmentStatus>,
    pub item_type: Option<ItemType>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct UpdateProgressRequest {
    pub progress: i32,
}

#[derive(Debug, Clone, Default)]
pub struct EnrollmentListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub user_id: Option<i64>,
    pub status: Option<EnrollmentStatus>,
    pub item_type: Option<ItemType>,
    /// 只返回这些商家拥有的商品的选课记录
    pub business_id: Option<i64>,
}
