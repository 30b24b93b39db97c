//! 购物车存储操作

use super::{SeaOrmStorage, map_write_err, now_ts};
use crate::entity::cart_items::{ActiveModel, Column, Entity as CartItems};
use crate::errors::{EduMarketError, Result};
use crate::models::{ProductRef, cart::entities::CartItem};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 列出用户购物车
    pub async fn list_cart_items_impl(&self, user_id: i64) -> Result<Vec<CartItem>> {
        let items = CartItems::find()
            .filter(Column::UserId.eq(user_id))
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| EduMarketError::database_operation(format!("查询购物车失败: {e}")))?;

        Ok(items.into_iter().map(|m| m.into_cart_item()).collect())
    }

    /// 加入购物车，重复加入返回 Conflict
    pub async fn add_cart_item_impl(&self, user_id: i64, item: ProductRef) -> Result<CartItem> {
        let model = ActiveModel {
            user_id: Set(user_id),
            item_type: Set(item.item_type.to_string()),
            item_id: Set(item.item_id),
            created_at: Set(now_ts()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| map_write_err(e, "Item already in cart", "加入购物车失败"))?;

        Ok(result.into_cart_item())
    }

    /// 移除购物车条目（仅限本人）
    pub async fn remove_cart_item_impl(&self, user_id: i64, cart_item_id: i64) -> Result<bool> {
        let result = CartItems::delete_many()
            .filter(Column::Id.eq(cart_item_id))
            .filter(Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(|e| EduMarketError::database_operation(format!("移除购物车条目失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 清空购物车
    pub async fn clear_cart_impl(&self, user_id: i64) -> Result<u64> {
        let result = CartItems::delete_many()
            .filter(Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(|e| EduMarketError::database_operation(format!("清空购物车失败: {e}")))?;

        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ItemType;
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::test_support::{seed_course, seed_user, seed_workbook};

    #[actix_web::test]
    async fn test_cart_add_remove_clear() {
        let storage = SeaOrmStorage::in_memory().await;
        let business = seed_user(&storage, "academy", UserRole::Business).await;
        let student = seed_user(&storage, "student", UserRole::User).await;
        let stranger = seed_user(&storage, "stranger", UserRole::User).await;
        let course = seed_course(&storage, business.id, "Grammar", 10_000).await;
        let workbook = seed_workbook(&storage, business.id, "Drill book", 8_000).await;

        let line = storage
            .add_cart_item_impl(
                student.id,
                ProductRef {
                    item_type: ItemType::Course,
                    item_id: course.id,
                },
            )
            .await
            .unwrap();
        storage
            .add_cart_item_impl(
                student.id,
                ProductRef {
                    item_type: ItemType::Workbook,
                    item_id: workbook.id,
                },
            )
            .await
            .unwrap();

        let dup = storage
            .add_cart_item_impl(
                student.id,
                ProductRef {
                    item_type: ItemType::Course,
                    item_id: course.id,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(dup.code(), "E008");

        // 不能删除别人的购物车条目
        assert!(!storage.remove_cart_item_impl(stranger.id, line.id).await.unwrap());
        assert!(storage.remove_cart_item_impl(student.id, line.id).await.unwrap());

        assert_eq!(storage.list_cart_items_impl(student.id).await.unwrap().len(), 1);
        assert_eq!(storage.clear_cart_impl(student.id).await.unwrap(), 1);
        assert!(storage.list_cart_items_impl(student.id).await.unwrap().is_empty());
    }
}
