//! 研讨会报名存储操作

use super::{SeaOrmStorage, map_write_err, now_ts};
use crate::entity::seminar_applications::{ActiveModel, Column, Entity as Applications};
use crate::entity::seminars::Entity as Seminars;
use crate::errors::{EduMarketError, Result};
use crate::models::applications::{
    entities::{ApplicationStatus, SeminarApplication},
    requests::ApplicationListQuery,
    responses::ApplicationListResponse,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

/// 名额已满时返回 CapacityExceeded
async fn ensure_seat_available<C: ConnectionTrait>(
    conn: &C,
    seminar_id: i64,
    capacity: Option<i32>,
) -> Result<()> {
    let Some(capacity) = capacity else {
        return Ok(());
    };

    let approved = Applications::find()
        .filter(Column::SeminarId.eq(seminar_id))
        .filter(Column::Status.eq(ApplicationStatus::Approved.to_string()))
        .count(conn)
        .await
        .map_err(|e| EduMarketError::database_operation(format!("统计报名人数失败: {e}")))?;

    if approved >= capacity.max(0) as u64 {
        return Err(EduMarketError::capacity_exceeded("Seminar is full"));
    }
    Ok(())
}

impl SeaOrmStorage {
    /// 报名研讨会；已取消的报名重新激活为 pending
    pub async fn create_application_impl(
        &self,
        seminar_id: i64,
        user_id: i64,
        message: Option<String>,
    ) -> Result<SeminarApplication> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EduMarketError::database_operation(format!("开启事务失败: {e}")))?;

        let seminar = Seminars::find_by_id(seminar_id)
            .one(&txn)
            .await
            .map_err(|e| EduMarketError::database_operation(format!("查询研讨会失败: {e}")))?
            .ok_or_else(|| EduMarketError::not_found("Seminar not found"))?;

        ensure_seat_available(&txn, seminar_id, seminar.capacity).await?;

        let existing = Applications::find()
            .filter(Column::SeminarId.eq(seminar_id))
            .filter(Column::UserId.eq(user_id))
            .one(&txn)
            .await
            .map_err(|e| EduMarketError::database_operation(format!("查询报名失败: {e}")))?;

        let now = now_ts();
        let saved = match existing {
            Some(existing) if existing.status == ApplicationStatus::Cancelled.to_string() => {
                let mut model: ActiveModel = existing.into();
                model.status = Set(ApplicationStatus::Pending.to_string());
                model.message = Set(message);
                model.updated_at = Set(now);
                model
                    .update(&txn)
                    .await
                    .map_err(|e| EduMarketError::database_operation(format!("更新报名失败: {e}")))?
            }
            Some(_) => {
                return Err(EduMarketError::conflict("Already applied to this seminar"));
            }
            None => ActiveModel {
                seminar_id: Set(seminar_id),
                user_id: Set(user_id),
                status: Set(ApplicationStatus::Pending.to_string()),
                message: Set(message),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(|e| map_write_err(e, "Already applied to this seminar", "创建报名失败"))?,
        };

        txn.commit()
            .await
            .map_err(|e| EduMarketError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(saved.into_application())
    }

    /// 通过 ID 获取报名
    pub async fn get_application_by_id_impl(&self, id: i64) -> Result<Option<SeminarApplication>> {
        let result = Applications::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EduMarketError::database_operation(format!("查询报名失败: {e}")))?;

        Ok(result.map(|m| m.into_application()))
    }

    /// 分页列出报名
    pub async fn list_applications_with_pagination_impl(
        &self,
        query: ApplicationListQuery,
    ) -> Result<ApplicationListResponse> {
        let mut select = Applications::find();

        if let Some(seminar_id) = query.seminar_id {
            select = select.filter(Column::SeminarId.eq(seminar_id));
        }
        if let Some(user_id) = query.user_id {
            select = select.filter(Column::UserId.eq(user_id));
        }
        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        select = select.order_by_desc(Column::CreatedAt).order_by_desc(Column::Id);

        let (items, pagination) = self.fetch_page(select, query.page, query.size).await?;

        Ok(ApplicationListResponse {
            items: items.into_iter().map(|m| m.into_application()).collect(),
            pagination,
        })
    }

    /// 更新报名状态；批准时检查名额
    pub async fn update_application_status_impl(
        &self,
        id: i64,
        status: ApplicationStatus,
        capacity: Option<i32>,
    ) -> Result<Option<SeminarApplication>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EduMarketError::database_operation(format!("开启事务失败: {e}")))?;

        let Some(existing) = Applications::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| EduMarketError::database_operation(format!("查询报名失败: {e}")))?
        else {
            return Ok(None);
        };

        let already_approved = existing.status == ApplicationStatus::Approved.to_string();
        if status == ApplicationStatus::Approved && !already_approved {
            ensure_seat_available(&txn, existing.seminar_id, capacity).await?;
        }

        let mut model: ActiveModel = existing.into();
        model.status = Set(status.to_string());
        model.updated_at = Set(now_ts());
        let updated = model
            .update(&txn)
            .await
            .map_err(|e| EduMarketError::database_operation(format!("更新报名状态失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| EduMarketError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(Some(updated.into_application()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::seminars::{entities::SeminarKind, requests::NewSeminar};
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::test_support::seed_user;

    async fn seminar_with_capacity(storage: &SeaOrmStorage, capacity: Option<i32>) -> i64 {
        let business = seed_user(storage, "academy", UserRole::Business).await;
        storage
            .create_seminar_impl(NewSeminar {
                business_id: business.id,
                kind: SeminarKind::Event,
                title: "Open class".to_string(),
                description: None,
                location: None,
                starts_at: None,
                capacity,
                price: 0,
                source_material_id: None,
                analysis_json: None,
            })
            .await
            .unwrap()
            .id
    }

    #[actix_web::test]
    async fn test_duplicate_application_conflicts_until_cancelled() {
        let storage = SeaOrmStorage::in_memory().await;
        let seminar_id = seminar_with_capacity(&storage, None).await;
        let student = seed_user(&storage, "student", UserRole::User).await;

        let first = storage
            .create_application_impl(seminar_id, student.id, None)
            .await
            .unwrap();
        assert_eq!(first.status, ApplicationStatus::Pending);

        let err = storage
            .create_application_impl(seminar_id, student.id, None)
            .await
            .unwrap_err();
        assert!(matches!(err, EduMarketError::Conflict(_)));

        storage
            .update_application_status_impl(first.id, ApplicationStatus::Cancelled, None)
            .await
            .unwrap();
        let again = storage
            .create_application_impl(seminar_id, student.id, Some("again".to_string()))
            .await
            .unwrap();
        assert_eq!(again.id, first.id);
        assert_eq!(again.status, ApplicationStatus::Pending);
    }

    #[actix_web::test]
    async fn test_capacity_enforced_on_approve_and_apply() {
        let storage = SeaOrmStorage::in_memory().await;
        let seminar_id = seminar_with_capacity(&storage, Some(1)).await;
        let a = seed_user(&storage, "student_a", UserRole::User).await;
        let b = seed_user(&storage, "student_b", UserRole::User).await;
        let c = seed_user(&storage, "student_c", UserRole::User).await;

        let app_a = storage
            .create_application_impl(seminar_id, a.id, None)
            .await
            .unwrap();
        let app_b = storage
            .create_application_impl(seminar_id, b.id, None)
            .await
            .unwrap();

        storage
            .update_application_status_impl(app_a.id, ApplicationStatus::Approved, Some(1))
            .await
            .unwrap();

        let full = storage
            .update_application_status_impl(app_b.id, ApplicationStatus::Approved, Some(1))
            .await
            .unwrap_err();
        assert!(matches!(full, EduMarketError::CapacityExceeded(_)));

        let late = storage
            .create_application_impl(seminar_id, c.id, None)
            .await
            .unwrap_err();
        assert!(matches!(late, EduMarketError::CapacityExceeded(_)));

        // 重新批准已批准的报名不占新名额
        assert!(
            storage
                .update_application_status_impl(app_a.id, ApplicationStatus::Approved, Some(1))
                .await
                .unwrap()
                .is_some()
        );
    }
}
