//! 讲师存储操作

use super::{SeaOrmStorage, now_ts};
use crate::entity::instructors::{ActiveModel, Column, Entity as Instructors};
use crate::errors::{EduMarketError, Result};
use crate::models::instructors::{
    entities::Instructor,
    requests::{CreateInstructorRequest, InstructorListQuery, UpdateInstructorRequest},
    responses::InstructorListResponse,
};
use crate::utils::contains_pattern;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 创建讲师
    pub async fn create_instructor_impl(
        &self,
        business_id: i64,
        req: CreateInstructorRequest,
    ) -> Result<Instructor> {
        let now = now_ts();

        let model = ActiveModel {
            business_id: Set(business_id),
            name: Set(req.name),
            bio: Set(req.bio),
            profile_image_url: Set(req.profile_image_url),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EduMarketError::database_operation(format!("创建讲师失败: {e}")))?;

        Ok(result.into_instructor())
    }

    /// 通过 ID 获取讲师
    pub async fn get_instructor_by_id_impl(&self, id: i64) -> Result<Option<Instructor>> {
        let result = Instructors::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EduMarketError::database_operation(format!("查询讲师失败: {e}")))?;

        Ok(result.map(|m| m.into_instructor()))
    }

    /// 分页列出讲师
    pub async fn list_instructors_with_pagination_impl(
        &self,
        query: InstructorListQuery,
    ) -> Result<InstructorListResponse> {
        let mut select = Instructors::find();

        if !query.include_inactive {
            select = select.filter(Column::IsActive.eq(true));
        }

        if let Some(business_id) = query.business_id {
            select = select.filter(Column::BusinessId.eq(business_id));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            select = select.filter(Column::Name.like(contains_pattern(search.trim())));
        }

        select = select.order_by_asc(Column::Name).order_by_asc(Column::Id);

        let (items, pagination) = self.fetch_page(select, query.page, query.size).await?;

        Ok(InstructorListResponse {
            items: items.into_iter().map(|m| m.into_instructor()).collect(),
            pagination,
        })
    }

    /// 更新讲师
    pub async fn update_instructor_impl(
        &self,
        id: i64,
        update: UpdateInstructorRequest,
    ) -> Result<Option<Instructor>> {
        if self.get_instructor_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now_ts()),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(bio) = update.bio {
            model.bio = Set(Some(bio));
        }
        if let Some(url) = update.profile_image_url {
            model.profile_image_url = Set(Some(url));
        }
        if let Some(is_active) = update.is_active {
            model.is_active = Set(is_active);
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| EduMarketError::database_operation(format!("更新讲师失败: {e}")))?;

        Ok(Some(updated.into_instructor()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::test_support::seed_user;

    #[actix_web::test]
    async fn test_inactive_instructors_hidden_from_public_list() {
        let storage = SeaOrmStorage::in_memory().await;
        let business = seed_user(&storage, "academy", UserRole::Business).await;

        let kim = storage
            .create_instructor_impl(
                business.id,
                CreateInstructorRequest {
                    name: "Kim".to_string(),
                    bio: None,
                    profile_image_url: None,
                },
            )
            .await
            .unwrap();
        storage
            .update_instructor_impl(
                kim.id,
                UpdateInstructorRequest {
                    name: None,
                    bio: None,
                    profile_image_url: None,
                    is_active: Some(false),
                },
            )
            .await
            .unwrap();

        let public = storage
            .list_instructors_with_pagination_impl(InstructorListQuery {
                page: None,
                size: None,
                business_id: Some(business.id),
                search: None,
                include_inactive: false,
            })
            .await
            .unwrap();
        assert!(public.items.is_empty());

        let own = storage
            .list_instructors_with_pagination_impl(InstructorListQuery {
                page: None,
                size: None,
                business_id: Some(business.id),
                search: Some("Ki".to_string()),
                include_inactive: true,
            })
            .await
            .unwrap();
        assert_eq!(own.items.len(), 1);
        assert!(!own.items[0].is_active);
    }
}
