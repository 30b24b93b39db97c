//! 评价存储操作

use super::{SeaOrmStorage, map_write_err, now_ts};
use crate::entity::reviews::{ActiveModel, Column, Entity as Reviews};
use crate::errors::{EduMarketError, Result};
use crate::models::{
    ProductRef,
    reviews::{
        entities::Review,
        requests::{CreateReviewRequest, UpdateReviewRequest},
        responses::ReviewListResponse,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

/// 按评分分组的条数 `(rating, count)` 汇总为总数和均值（保留两位小数）
fn summarize_ratings(buckets: &[(i32, i64)]) -> (i64, Option<f64>) {
    let count: i64 = buckets.iter().map(|(_, n)| n).sum();
    if count == 0 {
        return (0, None);
    }
    let sum: i64 = buckets.iter().map(|(rating, n)| i64::from(*rating) * n).sum();
    let avg = sum as f64 / count as f64;
    (count, Some((avg * 100.0).round() / 100.0))
}

impl SeaOrmStorage {
    /// 创建评价；同一用户对同一商品只保留一条
    pub async fn create_review_impl(
        &self,
        user_id: i64,
        req: CreateReviewRequest,
    ) -> Result<Review> {
        let now = now_ts();

        let existing = Reviews::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::ItemType.eq(req.item_type.to_string()))
            .filter(Column::ItemId.eq(req.item_id))
            .one(&self.db)
            .await
            .map_err(|e| EduMarketError::database_operation(format!("查询评价失败: {e}")))?;

        let saved = match existing {
            Some(existing) if !existing.is_active => {
                let mut model: ActiveModel = existing.into();
                model.rating = Set(req.rating);
                model.content = Set(req.content);
                model.is_active = Set(true);
                model.updated_at = Set(now);
                model
                    .update(&self.db)
                    .await
                    .map_err(|e| EduMarketError::database_operation(format!("更新评价失败: {e}")))?
            }
            Some(_) => return Err(EduMarketError::conflict("Review already exists")),
            None => ActiveModel {
                user_id: Set(user_id),
                item_type: Set(req.item_type.to_string()),
                item_id: Set(req.item_id),
                rating: Set(req.rating),
                content: Set(req.content),
                is_active: Set(true),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(&self.db)
            .await
            .map_err(|e| map_write_err(e, "Review already exists", "创建评价失败"))?,
        };

        Ok(saved.into_review())
    }

    /// 通过 ID 获取评价
    pub async fn get_review_by_id_impl(&self, id: i64) -> Result<Option<Review>> {
        let result = Reviews::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EduMarketError::database_operation(format!("查询评价失败: {e}")))?;

        Ok(result.map(|m| m.into_review()))
    }

    /// 商品的有效评价及平均分
    pub async fn list_item_reviews_impl(
        &self,
        item: ProductRef,
        page: Option<i64>,
        size: Option<i64>,
    ) -> Result<ReviewListResponse> {
        let base = Reviews::find()
            .filter(Column::ItemType.eq(item.item_type.to_string()))
            .filter(Column::ItemId.eq(item.item_id))
            .filter(Column::IsActive.eq(true));

        // 评分只有 1-5，分组计数最多返回五行
        let buckets: Vec<(i32, i64)> = base
            .clone()
            .select_only()
            .column(Column::Rating)
            .column_as(Column::Id.count(), "rating_count")
            .group_by(Column::Rating)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| EduMarketError::database_operation(format!("统计评分失败: {e}")))?;
        let (review_count, average_rating) = summarize_ratings(&buckets);

        let select = base
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id);
        let (items, pagination) = self.fetch_page(select, page, size).await?;

        Ok(ReviewListResponse {
            items: items.into_iter().map(|m| m.into_review()).collect(),
            pagination,
            average_rating,
            review_count,
        })
    }

    /// 更新评价
    pub async fn update_review_impl(
        &self,
        id: i64,
        update: UpdateReviewRequest,
    ) -> Result<Option<Review>> {
        if self.get_review_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now_ts()),
            ..Default::default()
        };

        if let Some(rating) = update.rating {
            model.rating = Set(rating);
        }
        if let Some(content) = update.content {
            model.content = Set(Some(content));
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| EduMarketError::database_operation(format!("更新评价失败: {e}")))?;

        Ok(Some(updated.into_review()))
    }

    /// 软删除评价
    pub async fn deactivate_review_impl(&self, id: i64) -> Result<bool> {
        let result = Reviews::update_many()
            .col_expr(Column::IsActive, sea_orm::sea_query::Expr::value(false))
            .col_expr(Column::UpdatedAt, sea_orm::sea_query::Expr::value(now_ts()))
            .filter(Column::Id.eq(id))
            .filter(Column::IsActive.eq(true))
            .exec(&self.db)
            .await
            .map_err(|e| EduMarketError::database_operation(format!("删除评价失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
