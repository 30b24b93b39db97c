use super::entities::Workbook;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/workbook.ts")]
pub struct WorkbookListResponse {
    pub items: Vec<Workbook>,
    pub pagination: PaginationInfo,
}
