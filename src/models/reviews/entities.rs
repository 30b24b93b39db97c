use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::common::ItemType;

// 评价
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/review.ts")]
pub struct Review {
    pub id: i64,
    pub user_id: i64,
    pub item_type: ItemType,
    pub item_id: i64,
    /// 1..=5
    pub rating: i32,
    pub content: Option<String>,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

pub fn validate_rating(rating: i32) -> Result<(), &'static str> {
    if (1..=5).contains(&rating) {
        Ok(())
    } else {
        Err("Rating must be between 1 and 5")
    }
}
