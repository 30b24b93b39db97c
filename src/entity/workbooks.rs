//! 练习册实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "workbooks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub business_id: i64,
    pub source_material_id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub page_count: Option<i32>,
    pub price: i64,
    pub discount_price: Option<i64>,
    pub thumbnail_url: Option<String>,
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
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Business.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_workbook(self) -> crate::models::workbooks::entities::Workbook {
        use crate::models::workbooks::entities::Workbook;

        Workbook {
            id: self.id,
            business_id: self.business_id,
            source_material_id: self.source_material_id,
            title: self.title,
            description: self.description,
            price: self.price,
            discount_price: self.discount_price,
            thumbnail_url: self.thumbnail_url,
            page_count: self.page_count,
            is_active: self.is_active,
            created_at: super::to_datetime(self.created_at),
            updated_at: super::to_datetime(self.updated_at),
        }
    }
}
