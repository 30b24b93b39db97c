use crate::models::common::ItemType;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/cart.ts")]
pub struct AddCartItemRequest {
    pub item_type: ItemType,
    pub item_id: i64,
}
