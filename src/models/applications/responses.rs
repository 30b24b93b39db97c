use super::entities::SeminarApplication;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/application.ts")]
pub struct ApplicationListResponse {
    pub items: Vec<SeminarApplication>,
    pub pagination: PaginationInfo,
}
