/*!
 * 聊天服务
 *
 * 客户端通过以下 URL 连接：
 * ```text
 * ws://host/api/v1/chat/ws?token=<access_token>&channel_id=<id>
 * ```
 *
 * 客户端帧：`{"type":"message","content":"..."}`、`{"type":"ping"}`
 *
 * 服务端帧：`connected`、`message`（payload 为保存后的消息）、`pong`、`error`
 */

pub mod hub;
pub mod session;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::cache::ObjectCache;
use crate::config::AppConfig;
use crate::middlewares::require_jwt::authenticate_token;
use crate::models::{
    ApiResponse, ErrorCode,
    chat::{
        requests::{ChatConnectParams, MessageHistoryParams},
        responses::{ChannelListResponse, MessageListResponse},
    },
    users::entities::UserStatus,
};
use crate::services::{error_response, not_found};
use crate::storage::Storage;
use session::ChatSession;

pub struct ChatService {
    storage: Option<Arc<dyn Storage>>,
}

impl ChatService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    #[cfg(test)]
    pub(crate) fn with_storage(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage: Some(storage),
        }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        super::resolve_storage(self.storage.as_ref(), request)
    }

    pub async fn list_channels(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;

        match storage.list_active_channels().await {
            Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                ChannelListResponse { items },
                "Channels retrieved successfully",
            ))),
            Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
        }
    }

    /// 最近的历史消息，按时间正序
    pub async fn list_messages(
        &self,
        channel_id: i64,
        query: MessageHistoryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;

        match storage.get_channel_by_id(channel_id).await {
            Ok(Some(channel)) if channel.is_active => {}
            Ok(_) => return Ok(not_found(ErrorCode::ChannelNotFound, "Channel not found")),
            Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
        }

        let max = AppConfig::get().chat.history_limit;
        let limit = query.limit.unwrap_or(max).clamp(1, max.max(1));

        match storage
            .list_channel_messages(channel_id, query.before_id, limit)
            .await
        {
            Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                MessageListResponse { items },
                "Messages retrieved successfully",
            ))),
            Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
        }
    }

    /// 校验令牌和频道后升级为 WebSocket
    pub async fn connect(
        &self,
        request: &HttpRequest,
        body: web::Payload,
        params: ChatConnectParams,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let cache = request
            .app_data::<web::Data<Arc<dyn ObjectCache>>>()
            .map(|data| data.get_ref().clone())
            .ok_or_else(|| actix_web::error::ErrorInternalServerError("Cache not configured"))?;

        let user = match authenticate_token(&params.token, &storage, &cache).await {
            Ok(user) => user,
            Err(message) => {
                return Ok(HttpResponse::Unauthorized()
                    .json(ApiResponse::error_empty(ErrorCode::Unauthorized, message)));
            }
        };
        if user.status != UserStatus::Active {
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::UserInactive,
                "User account is not active",
            )));
        }

        match storage.get_channel_by_id(params.channel_id).await {
            Ok(Some(channel)) if channel.is_active => {}
            Ok(_) => return Ok(not_found(ErrorCode::ChannelNotFound, "Channel not found")),
            Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
        }

        let (response, session, stream) = actix_ws::handle(request, body)?;

        let chat = ChatSession {
            storage,
            user,
            channel_id: params.channel_id,
            max_message_length: AppConfig::get().chat.max_message_length,
        };
        actix_web::rt::spawn(chat.run(session, stream));

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::chat::requests::CreateChannelRequest;
    use crate::models::users::entities::UserRole;
    use crate::services::test_support::{anonymous_request, body_json, memory_storage, seed};
    use actix_web::http::StatusCode;

    #[actix_web::test]
    async fn test_history_hidden_for_inactive_channel() {
        let storage = memory_storage().await;
        let admin = seed(&storage, "operator", UserRole::Admin).await;
        let channel = storage
            .create_channel(
                admin.id,
                CreateChannelRequest {
                    name: "ielts".to_string(),
                    description: None,
                },
            )
            .await
            .unwrap();
        for text in ["hello", "world"] {
            storage
                .create_chat_message(channel.id, admin.id, &admin.username, text)
                .await
                .unwrap();
        }
        let service = ChatService::with_storage(storage.clone());
        let history = || MessageHistoryParams {
            limit: Some(1),
            before_id: None,
        };

        let resp = service
            .list_messages(channel.id, history(), &anonymous_request())
            .await
            .unwrap();
        let body = body_json(resp).await;
        assert_eq!(body["data"]["items"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"]["items"][0]["content"], "world");

        storage.set_channel_active(channel.id, false).await.unwrap();
        let resp = service
            .list_messages(channel.id, history(), &anonymous_request())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = service.list_channels(&anonymous_request()).await.unwrap();
        assert!(body_json(resp).await["data"]["items"].as_array().unwrap().is_empty());
    }
}
