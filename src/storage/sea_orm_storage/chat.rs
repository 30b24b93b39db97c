//! 聊天存储操作

use std::collections::HashMap;

use super::{SeaOrmStorage, map_write_err, now_ts};
use crate::entity::chat_channels::{
    ActiveModel as ChannelActiveModel, Column as ChannelColumn, Entity as ChatChannels,
};
use crate::entity::chat_messages::{
    ActiveModel as MessageActiveModel, Column as MessageColumn, Entity as ChatMessages,
};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{EduMarketError, Result};
use crate::models::chat::{
    entities::{ChatChannel, ChatMessage},
    requests::CreateChannelRequest,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

impl SeaOrmStorage {
    /// 创建频道
    pub async fn create_channel_impl(
        &self,
        created_by: i64,
        req: CreateChannelRequest,
    ) -> Result<ChatChannel> {
        let model = ChannelActiveModel {
            name: Set(req.name),
            description: Set(req.description),
            created_by: Set(created_by),
            is_active: Set(true),
            created_at: Set(now_ts()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| map_write_err(e, "Channel name already exists", "创建频道失败"))?;

        Ok(result.into_channel())
    }

    /// 通过 ID 获取频道
    pub async fn get_channel_by_id_impl(&self, id: i64) -> Result<Option<ChatChannel>> {
        let result = ChatChannels::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EduMarketError::database_operation(format!("查询频道失败: {e}")))?;

        Ok(result.map(|m| m.into_channel()))
    }

    /// 列出启用的频道
    pub async fn list_active_channels_impl(&self) -> Result<Vec<ChatChannel>> {
        let channels = ChatChannels::find()
            .filter(ChannelColumn::IsActive.eq(true))
            .order_by_asc(ChannelColumn::Name)
            .all(&self.db)
            .await
            .map_err(|e| EduMarketError::database_operation(format!("查询频道列表失败: {e}")))?;

        Ok(channels.into_iter().map(|m| m.into_channel()).collect())
    }

    /// 启用或停用频道
    pub async fn set_channel_active_impl(
        &self,
        id: i64,
        is_active: bool,
    ) -> Result<Option<ChatChannel>> {
        let Some(existing) = ChatChannels::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EduMarketError::database_operation(format!("查询频道失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut model: ChannelActiveModel = existing.into();
        model.is_active = Set(is_active);
        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| EduMarketError::database_operation(format!("更新频道失败: {e}")))?;

        Ok(Some(updated.into_channel()))
    }

    /// 保存一条消息
    pub async fn create_chat_message_impl(
        &self,
        channel_id: i64,
        user_id: i64,
        username: &str,
        content: &str,
    ) -> Result<ChatMessage> {
        let model = MessageActiveModel {
            channel_id: Set(channel_id),
            user_id: Set(user_id),
            content: Set(content.to_string()),
            created_at: Set(now_ts()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EduMarketError::database_operation(format!("保存消息失败: {e}")))?;

        Ok(result.into_message(username.to_string()))
    }

    /// 最近的消息，按时间正序
    pub async fn list_channel_messages_impl(
        &self,
        channel_id: i64,
        before_id: Option<i64>,
        limit: u64,
    ) -> Result<Vec<ChatMessage>> {
        let mut select = ChatMessages::find().filter(MessageColumn::ChannelId.eq(channel_id));
        if let Some(before_id) = before_id {
            select = select.filter(MessageColumn::Id.lt(before_id));
        }

        let mut messages = select
            .order_by_desc(MessageColumn::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| EduMarketError::database_operation(format!("查询消息失败: {e}")))?;
        messages.reverse();

        let mut user_ids: Vec<i64> = messages.iter().map(|m| m.user_id).collect();
        user_ids.sort_unstable();
        user_ids.dedup();

        let usernames: HashMap<i64, String> = if user_ids.is_empty() {
            HashMap::new()
        } else {
            Users::find()
                .select_only()
                .column(UserColumn::Id)
                .column(UserColumn::Username)
                .filter(UserColumn::Id.is_in(user_ids))
                .into_tuple::<(i64, String)>()
                .all(&self.db)
                .await
                .map_err(|e| EduMarketError::database_operation(format!("查询用户名失败: {e}")))?
                .into_iter()
                .collect()
        };

        Ok(messages
            .into_iter()
            .map(|m| {
                let username = usernames.get(&m.user_id).cloned().unwrap_or_default();
                m.into_message(username)
            })
            .collect())
    }

    /// 删除早于 cutoff 的消息
    pub async fn delete_chat_messages_before_impl(&self, cutoff: i64) -> Result<u64> {
        let result = ChatMessages::delete_many()
            .filter(MessageColumn::CreatedAt.lt(cutoff))
            .exec(&self.db)
            .await
            .map_err(|e| EduMarketError::database_operation(format!("清理消息失败: {e}")))?;

        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::test_support::seed_user;

    #[actix_web::test]
    async fn test_history_order_and_cleanup() {
        let storage = SeaOrmStorage::in_memory().await;
        let admin = seed_user(&storage, "operator", UserRole::Admin).await;
        let student = seed_user(&storage, "student", UserRole::User).await;

        let channel = storage
            .create_channel_impl(
                admin.id,
                CreateChannelRequest {
                    name: "toeic-study".to_string(),
                    description: None,
                },
            )
            .await
            .unwrap();

        for text in ["first", "second", "third"] {
            storage
                .create_chat_message_impl(channel.id, student.id, &student.username, text)
                .await
                .unwrap();
        }

        let recent = storage
            .list_channel_messages_impl(channel.id, None, 2)
            .await
            .unwrap();
        let contents: Vec<_> = recent.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["second", "third"]);
        assert!(recent.iter().all(|m| m.username == "student"));

        let older = storage
            .list_channel_messages_impl(channel.id, Some(recent[0].id), 10)
            .await
            .unwrap();
        assert_eq!(older.len(), 1);
        assert_eq!(older[0].content, "first");

        assert_eq!(
            storage
                .delete_chat_messages_before_impl(now_ts() + 1)
                .await
                .unwrap(),
            3
        );
        assert_eq!(storage.delete_chat_messages_before_impl(0).await.unwrap(), 0);
    }

    #[actix_web::test]
    async fn test_channel_name_unique_and_deactivate() {
        let storage = SeaOrmStorage::in_memory().await;
        let admin = seed_user(&storage, "operator", UserRole::Admin).await;
        let request = || CreateChannelRequest {
            name: "lobby".to_string(),
            description: Some("general".to_string()),
        };

        let lobby = storage.create_channel_impl(admin.id, request()).await.unwrap();
        let dup = storage
            .create_channel_impl(admin.id, request())
            .await
            .unwrap_err();
        assert_eq!(dup.code(), "E008");

        storage
            .set_channel_active_impl(lobby.id, false)
            .await
            .unwrap()
            .unwrap();
        assert!(storage.list_active_channels_impl().await.unwrap().is_empty());
        assert!(storage.set_channel_active_impl(999, false).await.unwrap().is_none());
    }
}
