//! 研讨会实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "seminars")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub business_id: i64,
    pub kind: String,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: Option<i64>,
    pub capacity: Option<i32>,
    pub price: i64,
    pub source_material_id: Option<i64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub analysis_json: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::BusinessId",
        to = "super::users::Column::Id"
    )]
    Business,
    #[sea_orm(has_many = "super::seminar_applications::Entity")]
    Applications,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Business.def()
    }
}

impl Related<super::seminar_applications::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Applications.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_seminar(self) -> crate::models::seminars::entities::Seminar {
        use crate::models::seminars::entities::{Seminar, SeminarKind};

        // 存储的分析结果在写入前已校验，解析失败视为没有分析
        let analysis = self
            .analysis_json
            .as_deref()
            .and_then(|json| serde_json::from_str(json).ok());

        Seminar {
            id: self.id,
            business_id: self.business_id,
            kind: self.kind.parse().unwrap_or(SeminarKind::Event),
            title: self.title,
            description: self.description,
            location: self.location,
            starts_at: self.starts_at.map(super::to_datetime),
            capacity: self.capacity,
            price: self.price,
            source_material_id: self.source_material_id,
            analysis,
            is_active: self.is_active,
            created_at: super::to_datetime(self.created_at),
            updated_at: super::to_datetime(self.updated_at),
        }
    }
}
