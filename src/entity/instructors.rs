//! 讲师实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "instructors")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub business_id: i64,
    pub name: String,
    pub bio: Option<String>,
    pub profile_image_url: Option<String>,
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
    pub fn into_instructor(self) -> crate::models::instructors::entities::Instructor {
        use crate::models::instructors::entities::Instructor;

        Instructor {
            id: self.id,
            business_id: self.business_id,
            name: self.name,
            bio: self.bio,
            profile_image_url: self.profile_image_url,
            is_active: self.is_active,
            created_at: super::to_datetime(self.created_at),
            updated_at: super::to_datetime(self.updated_at),
        }
    }
}
