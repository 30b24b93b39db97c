use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::common::ItemType;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/cart.ts")]
pub struct CartItem {
    pub id: i64,
    pub user_id: i64,
    pub item_type: ItemType,
    pub item_id: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
