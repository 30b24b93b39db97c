use crate::models::common::ItemType;
use serde::Serialize;
use ts_rs::TS;

// 购物车中的一行，价格已解析为实际售价
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/cart.ts")]
pub struct CartLine {
    pub id: i64,
    pub item_type: ItemType,
    pub item_id: i64,
    pub title: String,
    pub price: i64,
    pub effective_price: i64,
    pub thumbnail_url: Option<String>,
    /// 商品已下架时为 false，结算时会被拒绝
    pub available: bool,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/cart.ts")]
pub struct CartResponse {
    pub items: Vec<CartLine>,
    pub total_amount: i64,
}
