//! 研讨会存储操作

use super::{SeaOrmStorage, now_ts};
use crate::entity::seminars::{ActiveModel, Column, Entity as Seminars};
use crate::errors::{EduMarketError, Result};
use crate::models::seminars::{
    entities::Seminar,
    requests::{NewSeminar, SeminarListQuery, UpdateSeminarRequest},
    responses::SeminarListResponse,
};
use crate::utils::contains_pattern;
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 创建研讨会
    pub async fn create_seminar_impl(&self, seminar: NewSeminar) -> Result<Seminar> {
        let now = now_ts();

        let model = ActiveModel {
            business_id: Set(seminar.business_id),
            kind: Set(seminar.kind.to_string()),
            title: Set(seminar.title),
            description: Set(seminar.description),
            location: Set(seminar.location),
            starts_at: Set(seminar.starts_at),
            capacity: Set(seminar.capacity),
            price: Set(seminar.price),
            source_material_id: Set(seminar.source_material_id),
            analysis_json: Set(seminar.analysis_json),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EduMarketError::database_operation(format!("创建研讨会失败: {e}")))?;

        Ok(result.into_seminar())
    }

    /// 通过 ID 获取研讨会
    pub async fn get_seminar_by_id_impl(&self, id: i64) -> Result<Option<Seminar>> {
        let result = Seminars::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EduMarketError::database_operation(format!("查询研讨会失败: {e}")))?;

        Ok(result.map(|m| m.into_seminar()))
    }

    /// 分页列出研讨会
    pub async fn list_seminars_with_pagination_impl(
        &self,
        query: SeminarListQuery,
    ) -> Result<SeminarListResponse> {
        let mut select = Seminars::find();

        if !query.include_inactive {
            select = select.filter(Column::IsActive.eq(true));
        }

        if let Some(kind) = query.kind {
            select = select.filter(Column::Kind.eq(kind.to_string()));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let search = search.trim();
            select = select.filter(
                Condition::any()
                    .add(Column::Title.like(contains_pattern(search)))
                    .add(Column::Description.like(contains_pattern(search))),
            );
        }

        if let Some(business_id) = query.business_id {
            select = select.filter(Column::BusinessId.eq(business_id));
        }

        select = select.order_by_desc(Column::CreatedAt).order_by_desc(Column::Id);

        let (items, pagination) = self.fetch_page(select, query.page, query.size).await?;

        Ok(SeminarListResponse {
            items: items.into_iter().map(|m| m.into_seminar()).collect(),
            pagination,
        })
    }

    /// 更新研讨会
    pub async fn update_seminar_impl(
        &self,
        id: i64,
        update: UpdateSeminarRequest,
    ) -> Result<Option<Seminar>> {
        if self.get_seminar_by_id_impl(id).await?.is_none() {
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
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(location) = update.location {
            model.location = Set(Some(location));
        }
        if let Some(starts_at) = update.starts_at {
            model.starts_at = Set(Some(starts_at));
        }
        if let Some(capacity) = update.capacity {
            model.capacity = Set(Some(capacity));
        }
        if let Some(price) = update.price {
            model.price = Set(price);
        }
        if let Some(is_active) = update.is_active {
            model.is_active = Set(is_active);
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| EduMarketError::database_operation(format!("更新研讨会失败: {e}")))?;

        Ok(Some(updated.into_seminar()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::materials::DocumentAnalysis;
    use crate::models::seminars::entities::SeminarKind;
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::test_support::seed_user;

    fn new_seminar(business_id: i64, kind: SeminarKind, analysis_json: Option<String>) -> NewSeminar {
        NewSeminar {
            business_id,
            kind,
            title: "Reading workshop".to_string(),
            description: None,
            location: Some("Seoul".to_string()),
            starts_at: Some(1_767_225_600),
            capacity: Some(20),
            price: 0,
            source_material_id: None,
            analysis_json,
        }
    }

    #[actix_web::test]
    async fn test_analysis_seminar_round_trips_document() {
        let storage = SeaOrmStorage::in_memory().await;
        let business = seed_user(&storage, "academy", UserRole::Business).await;

        let json = r#"{"title":"T","summary":"S","sentences":[{"index":1,"text":"Hi.","translation":"안녕."}]}"#;
        let seminar = storage
            .create_seminar_impl(new_seminar(
                business.id,
                SeminarKind::Analysis,
                Some(json.to_string()),
            ))
            .await
            .unwrap();

        let analysis: &DocumentAnalysis = seminar.analysis.as_ref().unwrap();
        assert_eq!(analysis.sentences.len(), 1);
        assert_eq!(seminar.kind, SeminarKind::Analysis);
    }

    #[actix_web::test]
    async fn test_kind_filter() {
        let storage = SeaOrmStorage::in_memory().await;
        let business = seed_user(&storage, "academy", UserRole::Business).await;
        storage
            .create_seminar_impl(new_seminar(business.id, SeminarKind::Event, None))
            .await
            .unwrap();

        let analysis_only = storage
            .list_seminars_with_pagination_impl(SeminarListQuery {
                kind: Some(SeminarKind::Analysis),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(analysis_only.items.is_empty());

        let events = storage
            .list_seminars_with_pagination_impl(SeminarListQuery {
                kind: Some(SeminarKind::Event),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(events.pagination.total, 1);
    }
}
