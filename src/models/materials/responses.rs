use super::analysis::DocumentAnalysis;
use super::entities::SourceMaterial;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/material.ts")]
pub struct MaterialListResponse {
    pub items: Vec<SourceMaterial>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/material.ts")]
pub struct AnalysisResponse {
    pub material_id: i64,
    pub analysis: DocumentAnalysis,
    /// 是否直接返回了已缓存的结果
    pub cached: bool,
    /// 本次调用模型的次数
    pub attempts: u32,
}
