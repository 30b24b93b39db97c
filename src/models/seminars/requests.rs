use super::entities::SeminarKind;
use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/seminar.ts")]
pub struct SeminarListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub kind: Option<SeminarKind>,
    pub search: Option<String>,
    pub business_id: Option<i64>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/seminar.ts")]
pub struct CreateSeminarRequest {
    pub kind: SeminarKind,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    /// unix 秒
    pub starts_at: Option<i64>,
    pub capacity: Option<i32>,
    #[serde(default)]
    pub price: i64,
    /// analysis 类型必填
    pub source_material_id: Option<i64>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/seminar.ts")]
pub struct UpdateSeminarRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: Option<i64>,
    pub capacity: Option<i32>,
    pub price: Option<i64>,
    pub is_active: Option<bool>,
}

// 存储层创建参数，analysis_json 已由服务层从资料复制
#[derive(Debug, Clone)]
pub struct NewSeminar {
    pub business_id: i64,
    pub kind: SeminarKind,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: Option<i64>,
    pub capacity: Option<i32>,
    pub price: i64,
    pub source_material_id: Option<i64>,
    pub analysis_json: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SeminarListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub kind: Option<SeminarKind>,
    pub search: Option<String>,
    pub business_id: Option<i64>,
    pub include_inactive: bool,
}
