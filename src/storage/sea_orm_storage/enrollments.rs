//! 选课存储操作

use super::{SeaOrmStorage, now_ts};
use crate::entity::enrollments::{ActiveModel, Column, Entity as Enrollments};
use crate::errors::{EduMarketError, Result};
use crate::models::{
    ItemType, PaginationInfo, ProductRef, normalize_page,
    enrollments::{
        entities::{Enrollment, EnrollmentStatus},
        requests::EnrollmentListQuery,
        responses::EnrollmentListResponse,
    },
};
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 通过 ID 获取选课记录
    pub async fn get_enrollment_by_id_impl(&self, id: i64) -> Result<Option<Enrollment>> {
        let result = Enrollments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EduMarketError::database_operation(format!("查询选课记录失败: {e}")))?;

        Ok(result.map(|m| m.into_enrollment()))
    }

    /// 查找用户对某商品的选课记录
    pub async fn find_enrollment_impl(
        &self,
        user_id: i64,
        item: ProductRef,
    ) -> Result<Option<Enrollment>> {
        let result = Enrollments::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::ItemType.eq(item.item_type.to_string()))
            .filter(Column::ItemId.eq(item.item_id))
            .one(&self.db)
            .await
            .map_err(|e| EduMarketError::database_operation(format!("查询选课记录失败: {e}")))?;

        Ok(result.map(|m| m.into_enrollment()))
    }

    /// 分页列出选课记录；business_id 限定为该商家的商品
    pub async fn list_enrollments_with_pagination_impl(
        &self,
        query: EnrollmentListQuery,
    ) -> Result<EnrollmentListResponse> {
        let mut select = Enrollments::find();

        if let Some(user_id) = query.user_id {
            select = select.filter(Column::UserId.eq(user_id));
        }
        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }
        if let Some(item_type) = query.item_type {
            select = select.filter(Column::ItemType.eq(item_type.to_string()));
        }

        if let Some(business_id) = query.business_id {
            let mut owned = Condition::any();
            let mut has_items = false;
            for item_type in [ItemType::Course, ItemType::Workbook] {
                let ids = self.list_business_item_ids_impl(business_id, item_type).await?;
                if ids.is_empty() {
                    continue;
                }
                has_items = true;
                owned = owned.add(
                    Condition::all()
                        .add(Column::ItemType.eq(item_type.to_string()))
                        .add(Column::ItemId.is_in(ids)),
                );
            }

            if !has_items {
                let (page, size) = normalize_page(query.page, query.size);
                return Ok(EnrollmentListResponse {
                    items: Vec::new(),
                    pagination: PaginationInfo::new(page, size, 0),
                });
            }
            select = select.filter(owned);
        }

        select = select.order_by_desc(Column::CreatedAt).order_by_desc(Column::Id);

        let (items, pagination) = self.fetch_page(select, query.page, query.size).await?;

        Ok(EnrollmentListResponse {
            items: items.into_iter().map(|m| m.into_enrollment()).collect(),
            pagination,
        })
    }

    /// 更新学习进度，达到 100 时标记完成
    pub async fn update_enrollment_progress_impl(
        &self,
        id: i64,
        progress: i32,
    ) -> Result<Option<Enrollment>> {
        let Some(existing) = Enrollments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EduMarketError::database_operation(format!("查询选课记录失败: {e}")))?
        else {
            return Ok(None);
        };

        let progress = progress.clamp(0, 100);
        let mut model: ActiveModel = existing.into();
        model.progress = Set(progress);
        if progress == 100 {
            model.status = Set(EnrollmentStatus::Completed.to_string());
        }
        model.updated_at = Set(now_ts());

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| EduMarketError::database_operation(format!("更新学习进度失败: {e}")))?;

        Ok(Some(updated.into_enrollment()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::payments::{entities::PaymentLine, requests::NewPayment};
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::test_support::{seed_course, seed_user, seed_workbook};

    #[actix_web::test]
    async fn test_business_filter_and_progress_completion() {
        let storage = SeaOrmStorage::in_memory().await;
        let mine = seed_user(&storage, "academy", UserRole::Business).await;
        let other = seed_user(&storage, "another", UserRole::Business).await;
        let idle = seed_user(&storage, "idle", UserRole::Business).await;
        let student = seed_user(&storage, "student", UserRole::User).await;
        let course = seed_course(&storage, mine.id, "Grammar", 10_000).await;
        let workbook = seed_workbook(&storage, other.id, "Drill", 5_000).await;

        let payment = storage
            .create_payment_impl(NewPayment {
                user_id: student.id,
                order_id: "order-enroll".to_string(),
                amount: 15_000,
                items: vec![
                    PaymentLine {
                        item_type: ItemType::Course,
                        item_id: course.id,
                        title: course.title.clone(),
                        amount: 10_000,
                    },
                    PaymentLine {
                        item_type: ItemType::Workbook,
                        item_id: workbook.id,
                        title: workbook.title.clone(),
                        amount: 5_000,
                    },
                ],
            })
            .await
            .unwrap();
        storage.confirm_payment_impl(&payment.order_id, None).await.unwrap();

        let own = storage
            .list_enrollments_with_pagination_impl(EnrollmentListQuery {
                business_id: Some(mine.id),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(own.pagination.total, 1);
        assert_eq!(own.items[0].item_type, ItemType::Course);

        let none = storage
            .list_enrollments_with_pagination_impl(EnrollmentListQuery {
                business_id: Some(idle.id),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(none.items.is_empty());

        let enrollment = storage
            .find_enrollment_impl(
                student.id,
                ProductRef {
                    item_type: ItemType::Course,
                    item_id: course.id,
                },
            )
            .await
            .unwrap()
            .unwrap();
        let half = storage
            .update_enrollment_progress_impl(enrollment.id, 50)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(half.status, EnrollmentStatus::Active);

        let done = storage
            .update_enrollment_progress_impl(enrollment.id, 100)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(done.status, EnrollmentStatus::Completed);
        assert_eq!(done.progress, 100);
    }
}
