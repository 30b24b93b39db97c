use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::common::ItemType;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub enum EnrollmentStatus {
    Active,
    Cancelled,
    Completed,
}

impl EnrollmentStatus {
    /// 可以评价的状态
    pub fn allows_review(&self) -> bool {
        matches!(self, Self::Active | Self::Completed)
    }
}

impl std::fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnrollmentStatus::Active => write!(f, "active"),
            EnrollmentStatus::Cancelled => write!(f, "cancelled"),
            EnrollmentStatus::Completed => write!(f, "completed"),
        }
    }
}

impl std::str::FromStr for EnrollmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(EnrollmentStatus::Active),
            "cancelled" => Ok(EnrollmentStatus::Cancelled),
            "completed" => Ok(EnrollmentStatus::Completed),
            _ => Err(format!("Invalid enrollment status: {s}")),
        }
    }
}

// 选课（购买后的学习记录）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct Enrollment {
    pub id: i64,
    pub user_id: i64,
    pub item_type: ItemType,
    pub item_id: i64,
    pub payment_id: Option<i64>,
    pub status: EnrollmentStatus,
    /// 0..=100
    pub progress: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
