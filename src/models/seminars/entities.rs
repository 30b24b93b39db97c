use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::materials::DocumentAnalysis;

// 研讨会类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/seminar.ts")]
pub enum SeminarKind {
    Event,    // 线下 / 线上活动
    Analysis, // 由资料分析生成的学习文档
}

impl std::fmt::Display for SeminarKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeminarKind::Event => write!(f, "event"),
            SeminarKind::Analysis => write!(f, "analysis"),
        }
    }
}

impl std::str::FromStr for SeminarKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "event" => Ok(SeminarKind::Event),
            "analysis" => Ok(SeminarKind::Analysis),
            _ => Err(format!("Invalid seminar kind: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/seminar.ts")]
pub struct Seminar {
    pub id: i64,
    pub business_id: i64,
    pub kind: SeminarKind,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: Option<chrono::DateTime<chrono::Utc>>,
    /// None 表示不限人数
    pub capacity: Option<i32>,
    pub price: i64,
    pub source_material_id: Option<i64>,
    pub analysis: Option<DocumentAnalysis>,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
