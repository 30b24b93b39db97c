use super::entities::Seminar;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/seminar.ts")]
pub struct SeminarListResponse {
    pub items: Vec<Seminar>,
    pub pagination: PaginationInfo,
}
