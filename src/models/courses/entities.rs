use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::common::effective_price;

// 课程
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct Course {
    pub id: i64,
    pub business_id: i64,
    pub instructor_id: Option<i64>,
    pub source_material_id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub level: Option<String>,
    /// 价格（韩元）
    pub price: i64,
    pub discount_price: Option<i64>,
    pub thumbnail_url: Option<String>,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Course {
    pub fn effective_price(&self) -> i64 {
        effective_price(self.price, self.discount_price)
    }
}
