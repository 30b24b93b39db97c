use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::common::effective_price;

// 练习册（海外项目教材）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/workbook.ts")]
pub struct Workbook {
    pub id: i64,
    pub business_id: i64,
    pub source_material_id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub price: i64,
    pub discount_price: Option<i64>,
    pub thumbnail_url: Option<String>,
    pub page_count: Option<i32>,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Workbook {
    pub fn effective_price(&self) -> i64 {
        effective_price(self.price, self.discount_price)
    }
}
