//! 研讨会报名实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "seminar_applications")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub seminar_id: i64,
    pub user_id: i64,
    pub status: String,
    pub message: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::seminars::Entity",
        from = "Column::SeminarId",
        to = "super::seminars::Column::Id"
    )]
    Seminar,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::seminars::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Seminar.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_application(self) -> crate::models::applications::entities::SeminarApplication {
        use crate::models::applications::entities::{ApplicationStatus, SeminarApplication};

        SeminarApplication {
            id: self.id,
            seminar_id: self.seminar_id,
            user_id: self.user_id,
            status: self.status.parse().unwrap_or(ApplicationStatus::Pending),
            message: self.message,
            created_at: super::to_datetime(self.created_at),
            updated_at: super::to_datetime(self.updated_at),
        }
    }
}
