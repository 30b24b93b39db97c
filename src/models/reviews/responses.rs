use super::entities::Review;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/review.ts")]
pub struct ReviewListResponse {
    pub items: Vec<Review>,
    pub pagination: PaginationInfo,
    /// 没有评价时为 None
    pub average_rating: Option<f64>,
    pub review_count: i64,
}
