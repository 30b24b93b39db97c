use super::entities::Notice;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/notice.ts")]
pub struct NoticeListResponse {
    pub items: Vec<Notice>,
    pub pagination: PaginationInfo,
}
