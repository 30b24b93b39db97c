//! 聊天消息实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "chat_messages")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub channel_id: i64,
    pub user_id: i64,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::chat_channels::Entity",
        from = "Column::ChannelId",
        to = "super::chat_channels::Column::Id"
    )]
    Channel,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::chat_channels::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Channel.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// 用户名需要单独查询后传入
    pub fn into_message(self, username: String) -> crate::models::chat::entities::ChatMessage {
        crate::models::chat::entities::ChatMessage {
            id: self.id,
            channel_id: self.channel_id,
            user_id: self.user_id,
            username,
            content: self.content,
            created_at: super::to_datetime(self.created_at),
        }
    }
}
