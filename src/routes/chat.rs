use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::chat::requests::{ChatConnectParams, MessageHistoryParams};
use crate::services::ChatService;
use crate::utils::SafeIDI64;

static CHAT_SERVICE: Lazy<ChatService> = Lazy::new(ChatService::new_lazy);

pub async fn list_channels(req: HttpRequest) -> ActixResult<HttpResponse> {
    CHAT_SERVICE.list_channels(&req).await
}

pub async fn list_messages(
    req: HttpRequest,
    id: SafeIDI64,
    query: web::Query<MessageHistoryParams>,
) -> ActixResult<HttpResponse> {
    CHAT_SERVICE
        .list_messages(id.0, query.into_inner(), &req)
        .await
}

// 浏览器 WebSocket 无法携带 Authorization 头，令牌在查询串中校验
pub async fn connect(
    req: HttpRequest,
    body: web::Payload,
    query: web::Query<ChatConnectParams>,
) -> ActixResult<HttpResponse> {
    CHAT_SERVICE.connect(&req, body, query.into_inner()).await
}

// 配置路由
pub fn configure_chat_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/chat")
            .route("/channels", web::get().to(list_channels))
            .route("/ws", web::get().to(connect))
            .service(
                web::scope("")
                    .wrap(middlewares::RequireJWT)
                    .route("/channels/{id}/messages", web::get().to(list_messages)),
            ),
    );
}
