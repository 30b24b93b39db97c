use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::analysis::DocumentAnalysis;

// 分析状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/material.ts")]
pub enum AnalysisStatus {
    None,
    Pending,
    Completed,
    Failed,
}

impl std::fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisStatus::None => write!(f, "none"),
            AnalysisStatus::Pending => write!(f, "pending"),
            AnalysisStatus::Completed => write!(f, "completed"),
            AnalysisStatus::Failed => write!(f, "failed"),
        }
    }
}

impl std::str::FromStr for AnalysisStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(AnalysisStatus::None),
            "pending" => Ok(AnalysisStatus::Pending),
            "completed" => Ok(AnalysisStatus::Completed),
            "failed" => Ok(AnalysisStatus::Failed),
            _ => Err(format!("Invalid analysis status: {s}")),
        }
    }
}

// 原始资料（商家上传的文本）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/material.ts")]
pub struct SourceMaterial {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub file_name: Option<String>,
    /// 外部文件地址，仅作引用
    pub file_url: Option<String>,
    pub content_text: String,
    pub analysis_status: AnalysisStatus,
    pub analysis: Option<DocumentAnalysis>,
    pub analyzed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
