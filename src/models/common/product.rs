use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 可售商品类型；研讨会通过报名而不是购物车获取
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/product.ts")]
pub enum ItemType {
    Course,
    Workbook,
}

impl ItemType {
    pub const COURSE: &'static str = "course";
    pub const WORKBOOK: &'static str = "workbook";
}

impl<'de> Deserialize<'de> for ItemType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for ItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemType::Course => write!(f, "{}", ItemType::COURSE),
            ItemType::Workbook => write!(f, "{}", ItemType::WORKBOOK),
        }
    }
}

impl std::str::FromStr for ItemType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ItemType::COURSE => Ok(ItemType::Course),
            ItemType::WORKBOOK => Ok(ItemType::Workbook),
            _ => Err(format!(
                "Invalid item type: '{s}'. Supported types: course, workbook"
            )),
        }
    }
}

/// 商品引用 (item_type, item_id)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/product.ts")]
pub struct ProductRef {
    pub item_type: ItemType,
    pub item_id: i64,
}

/// 管理员上下架请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/product.ts")]
pub struct SetActiveRequest {
    pub is_active: bool,
}

/// 实际售价：有折扣价时取折扣价
pub fn effective_price(price: i64, discount_price: Option<i64>) -> i64 {
    discount_price.unwrap_or(price)
}

/// 单个商品的价格上限（원）
pub const MAX_PRICE: i64 = 100_000_000_000;

/// 合计金额，溢出时返回 None
pub fn sum_prices<I: IntoIterator<Item = i64>>(prices: I) -> Option<i64> {
    prices
        .into_iter()
        .try_fold(0_i64, |total, price| total.checked_add(price))
}

/// 校验价格：0..=MAX_PRICE 且折扣价不高于原价
pub fn validate_price(price: i64, discount_price: Option<i64>) -> Result<(), &'static str> {
    if price < 0 {
        return Err("Price must not be negative");
    }
    if price > MAX_PRICE {
        return Err("Price exceeds the allowed maximum");
    }
    match discount_price {
        Some(d) if d < 0 => Err("Discount price must not be negative"),
        Some(d) if d > price => Err("Discount price must not exceed price"),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_price() {
        assert_eq!(effective_price(50000, None), 50000);
        assert_eq!(effective_price(50000, Some(39000)), 39000);
        assert_eq!(effective_price(50000, Some(0)), 0);
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(0, None).is_ok());
        assert!(validate_price(10000, Some(10000)).is_ok());
        assert!(validate_price(-1, None).is_err());
        assert!(validate_price(10000, Some(10001)).is_err());
        assert!(validate_price(10000, Some(-5)).is_err());
        assert!(validate_price(MAX_PRICE, None).is_ok());
        assert!(validate_price(MAX_PRICE + 1, None).is_err());
    }

    #[test]
    fn test_sum_prices_detects_overflow() {
        assert_eq!(sum_prices([40_000, 30_000]), Some(70_000));
        assert_eq!(sum_prices(Vec::new()), Some(0));
        assert_eq!(sum_prices([i64::MAX, 1]), None);
    }

    #[test]
    fn test_item_type_parse() {
        assert_eq!("course".parse::<ItemType>().unwrap(), ItemType::Course);
        assert_eq!(ItemType::Workbook.to_string(), "workbook");
        assert!("seminar".parse::<ItemType>().is_err());

        let r: ProductRef = serde_json::from_str(r#"{"item_type":"workbook","item_id":7}"#).unwrap();
        assert_eq!(r.item_type, ItemType::Workbook);
        assert_eq!(r.item_id, 7);
    }
}
