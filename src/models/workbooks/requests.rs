use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/workbook.ts")]
pub struct WorkbookListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
    pub business_id: Option<i64>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/workbook.ts")]
pub struct CreateWorkbookRequest {
    pub title: String,
    pub description: Option<String>,
    pub price: i64,
    pub discount_price: Option<i64>,
    pub thumbnail_url: Option<String>,
    pub page_count: Option<i32>,
    pub source_material_id: Option<i64>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/workbook.ts")]
pub struct UpdateWorkbookRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub discount_price: Option<i64>,
    #[serde(default)]
    pub clear_discount: bool,
    pub thumbnail_url: Option<String>,
    pub page_count: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct WorkbookListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub search: Option<String>,
    pub business_id: Option<i64>,
    pub include_inactive: bool,
}
