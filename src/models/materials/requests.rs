use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/material.ts")]
pub struct MaterialListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/material.ts")]
pub struct CreateMaterialRequest {
    pub title: String,
    /// 已提取的正文
    pub content_text: String,
    pub file_name: Option<String>,
    pub file_url: Option<String>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/material.ts")]
pub struct AnalyzeMaterialRequest {
    /// 忽略已完成的分析结果，重新分析
    #[serde(default)]
    pub force: bool,
}

#[derive(Debug, Clone, Default)]
pub struct MaterialListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    /// None 表示不按所有者过滤（管理员）
    pub owner_id: Option<i64>,
    pub search: Option<String>,
}
