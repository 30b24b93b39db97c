//! 原始资料实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "source_materials")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub file_name: Option<String>,
    pub file_url: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub content_text: String,
    pub analysis_status: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub analysis_json: Option<String>,
    pub analyzed_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::OwnerId",
        to = "super::users::Column::Id"
    )]
    Owner,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_material(self) -> crate::models::materials::entities::SourceMaterial {
        use crate::models::materials::entities::{AnalysisStatus, SourceMaterial};

        let analysis = self
            .analysis_json
            .as_deref()
            .and_then(|json| serde_json::from_str(json).ok());

        SourceMaterial {
            id: self.id,
            owner_id: self.owner_id,
            title: self.title,
            file_name: self.file_name,
            file_url: self.file_url,
            content_text: self.content_text,
            analysis_status: self
                .analysis_status
                .parse()
                .unwrap_or(AnalysisStatus::None),
            analysis,
            analyzed_at: self.analyzed_at.map(super::to_datetime),
            created_at: super::to_datetime(self.created_at),
            updated_at: super::to_datetime(self.updated_at),
        }
    }
}
