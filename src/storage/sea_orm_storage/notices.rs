//! 公告存储操作

use super::{SeaOrmStorage, now_ts};
use crate::entity::notices::{ActiveModel, Column, Entity as Notices};
use crate::errors::{EduMarketError, Result};
use crate::models::notices::{
    entities::Notice,
    requests::{CreateNoticeRequest, NoticeListQuery, UpdateNoticeRequest},
    responses::NoticeListResponse,
};
use crate::utils::contains_pattern;
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 创建公告
    pub async fn create_notice_impl(
        &self,
        author_id: i64,
        req: CreateNoticeRequest,
    ) -> Result<Notice> {
        let now = now_ts();

        let model = ActiveModel {
            author_id: Set(author_id),
            title: Set(req.title),
            content: Set(req.content),
            is_pinned: Set(req.is_pinned),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EduMarketError::database_operation(format!("创建公告失败: {e}")))?;

        Ok(result.into_notice())
    }

    /// 通过 ID 获取公告
    pub async fn get_notice_by_id_impl(&self, id: i64) -> Result<Option<Notice>> {
        let result = Notices::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EduMarketError::database_operation(format!("查询公告失败: {e}")))?;

        Ok(result.map(|m| m.into_notice()))
    }

    /// 分页列出公告，置顶优先
    pub async fn list_notices_with_pagination_impl(
        &self,
        query: NoticeListQuery,
    ) -> Result<NoticeListResponse> {
        let mut select = Notices::find();

        if !query.include_inactive {
            select = select.filter(Column::IsActive.eq(true));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let search = search.trim();
            select = select.filter(
                Condition::any()
                    .add(Column::Title.like(contains_pattern(search)))
                    .add(Column::Content.like(contains_pattern(search))),
            );
        }

        select = select
            .order_by_desc(Column::IsPinned)
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id);

        let (items, pagination) = self.fetch_page(select, query.page, query.size).await?;

        Ok(NoticeListResponse {
            items: items.into_iter().map(|m| m.into_notice()).collect(),
            pagination,
        })
    }

    /// 更新公告
    pub async fn update_notice_impl(
        &self,
        id: i64,
        update: UpdateNoticeRequest,
    ) -> Result<Option<Notice>> {
        if self.get_notice_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now_ts()),
            ..Default::default()
        };

        if let Some(title) = update.title {
            model.title = Set(title);
        }
        if let Some(content) = update.content {
            model.content = Set(content);
        }
        if let Some(is_pinned) = update.is_pinned {
            model.is_pinned = Set(is_pinned);
        }
        if let Some(is_active) = update.is_active {
            model.is_active = Set(is_active);
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| EduMarketError::database_operation(format!("更新公告失败: {e}")))?;

        Ok(Some(updated.into_notice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::test_support::seed_user;

    #[actix_web::test]
    async fn test_pinned_notices_listed_first() {
        let storage = SeaOrmStorage::in_memory().await;
        let admin = seed_user(&storage, "operator", UserRole::Admin).await;

        let pinned = storage
            .create_notice_impl(
                admin.id,
                CreateNoticeRequest {
                    title: "필독".to_string(),
                    content: "pinned".to_string(),
                    is_pinned: true,
                },
            )
            .await
            .unwrap();
        let hidden = storage
            .create_notice_impl(
                admin.id,
                CreateNoticeRequest {
                    title: "old".to_string(),
                    content: "hidden".to_string(),
                    is_pinned: false,
                },
            )
            .await
            .unwrap();
        storage
            .create_notice_impl(
                admin.id,
                CreateNoticeRequest {
                    title: "new".to_string(),
                    content: "latest".to_string(),
                    is_pinned: false,
                },
            )
            .await
            .unwrap();

        storage
            .update_notice_impl(
                hidden.id,
                UpdateNoticeRequest {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let list = storage
            .list_notices_with_pagination_impl(NoticeListQuery::default())
            .await
            .unwrap();
        assert_eq!(list.pagination.total, 2);
        assert_eq!(list.items[0].id, pinned.id);
        assert_eq!(list.items[1].title, "new");
    }
}
