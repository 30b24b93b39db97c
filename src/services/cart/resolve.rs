//! 商品引用解析：购物车展示和结算共用

use std::sync::Arc;

use crate::errors::Result;
use crate::models::{ItemType, ProductRef};
use crate::storage::Storage;

/// 解析后的商品快照
#[derive(Debug, Clone)]
pub struct ResolvedProduct {
    pub item: ProductRef,
    pub title: String,
    pub price: i64,
    pub effective_price: i64,
    pub thumbnail_url: Option<String>,
    pub is_active: bool,
}

pub async fn resolve_product(
    storage: &Arc<dyn Storage>,
    item: ProductRef,
) -> Result<Option<ResolvedProduct>> {
    let resolved = match item.item_type {
        ItemType::Course => storage
            .get_course_by_id(item.item_id)
            .await?
            .map(|course| ResolvedProduct {
                item,
                effective_price: course.effective_price(),
                title: course.title,
                price: course.price,
                thumbnail_url: course.thumbnail_url,
                is_active: course.is_active,
            }),
        ItemType::Workbook => storage
            .get_workbook_by_id(item.item_id)
            .await?
            .map(|workbook| ResolvedProduct {
                item,
                effective_price: workbook.effective_price(),
                title: workbook.title,
                price: workbook.price,
                thumbnail_url: workbook.thumbnail_url,
                is_active: workbook.is_active,
            }),
    };
    Ok(resolved)
}
