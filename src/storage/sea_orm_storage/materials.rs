//! 原始资料存储操作

use super::{SeaOrmStorage, now_ts};
use crate::entity::source_materials::{ActiveModel, Column, Entity as SourceMaterials};
use crate::errors::{EduMarketError, Result};
use crate::models::materials::{
    entities::{AnalysisStatus, SourceMaterial},
    requests::{CreateMaterialRequest, MaterialListQuery},
    responses::MaterialListResponse,
};
use crate::utils::contains_pattern;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 创建资料
    pub async fn create_material_impl(
        &self,
        owner_id: i64,
        req: CreateMaterialRequest,
    ) -> Result<SourceMaterial> {
        let now = now_ts();

        let model = ActiveModel {
            owner_id: Set(owner_id),
            title: Set(req.title),
            file_name: Set(req.file_name),
            file_url: Set(req.file_url),
            content_text: Set(req.content_text),
            analysis_status: Set(AnalysisStatus::None.to_string()),
            analysis_json: Set(None),
            analyzed_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EduMarketError::database_operation(format!("创建资料失败: {e}")))?;

        Ok(result.into_material())
    }

    /// 通过 ID 获取资料
    pub async fn get_material_by_id_impl(&self, id: i64) -> Result<Option<SourceMaterial>> {
        let result = SourceMaterials::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EduMarketError::database_operation(format!("查询资料失败: {e}")))?;

        Ok(result.map(|m| m.into_material()))
    }

    /// 分页列出资料
    pub async fn list_materials_with_pagination_impl(
        &self,
        query: MaterialListQuery,
    ) -> Result<MaterialListResponse> {
        let mut select = SourceMaterials::find();

        if let Some(owner_id) = query.owner_id {
            select = select.filter(Column::OwnerId.eq(owner_id));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            select = select.filter(Column::Title.like(contains_pattern(search.trim())));
        }

        select = select.order_by_desc(Column::CreatedAt).order_by_desc(Column::Id);

        let (items, pagination) = self.fetch_page(select, query.page, query.size).await?;

        Ok(MaterialListResponse {
            items: items.into_iter().map(|m| m.into_material()).collect(),
            pagination,
        })
    }

    /// 删除资料
    pub async fn delete_material_impl(&self, id: i64) -> Result<bool> {
        let result = SourceMaterials::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| EduMarketError::database_operation(format!("删除资料失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 更新分析状态；完成时写入结果与时间
    pub async fn update_material_analysis_impl(
        &self,
        id: i64,
        status: AnalysisStatus,
        analysis_json: Option<String>,
    ) -> Result<Option<SourceMaterial>> {
        let Some(existing) = SourceMaterials::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EduMarketError::database_operation(format!("查询资料失败: {e}")))?
        else {
            return Ok(None);
        };

        let now = now_ts();
        let mut model: ActiveModel = existing.into();
        model.analysis_status = Set(status.to_string());
        if let Some(json) = analysis_json {
            model.analysis_json = Set(Some(json));
        }
        if status == AnalysisStatus::Completed {
            model.analyzed_at = Set(Some(now));
        }
        model.updated_at = Set(now);

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| EduMarketError::database_operation(format!("更新分析状态失败: {e}")))?;

        Ok(Some(updated.into_material()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::test_support::seed_user;

    #[actix_web::test]
    async fn test_material_analysis_lifecycle() {
        let storage = SeaOrmStorage::in_memory().await;
        let owner = seed_user(&storage, "academy", UserRole::Business).await;

        let material = storage
            .create_material_impl(
                owner.id,
                CreateMaterialRequest {
                    title: "Mock exam 3".to_string(),
                    content_text: "The quick brown fox jumps over the lazy dog.".to_string(),
                    file_name: Some("mock3.pdf".to_string()),
                    file_url: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(material.analysis_status, AnalysisStatus::None);

        storage
            .update_material_analysis_impl(material.id, AnalysisStatus::Pending, None)
            .await
            .unwrap();

        let json = r#"{"title":"Fox","summary":"A fox jumps.","sentences":[{"index":1,"text":"The quick brown fox jumps over the lazy dog.","translation":"빠른 갈색 여우가 게으른 개를 뛰어넘는다."}]}"#;
        let done = storage
            .update_material_analysis_impl(
                material.id,
                AnalysisStatus::Completed,
                Some(json.to_string()),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(done.analysis_status, AnalysisStatus::Completed);
        assert!(done.analyzed_at.is_some());
        assert_eq!(done.analysis.map(|a| a.title), Some("Fox".to_string()));

        let others = storage
            .list_materials_with_pagination_impl(MaterialListQuery {
                owner_id: Some(owner.id + 1),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(others.items.is_empty());

        assert!(storage.delete_material_impl(material.id).await.unwrap());
        assert!(storage.get_material_by_id_impl(material.id).await.unwrap().is_none());
    }
}
