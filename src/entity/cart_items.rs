//! 购物车实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "cart_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub item_type: String,
    pub item_id: i64,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_cart_item(self) -> crate::models::cart::entities::CartItem {
        use crate::models::common::ItemType;

        crate::models::cart::entities::CartItem {
            id: self.id,
            user_id: self.user_id,
            item_type: self.item_type.parse().unwrap_or(ItemType::Course),
            item_id: self.item_id,
            created_at: super::to_datetime(self.created_at),
        }
    }
}
