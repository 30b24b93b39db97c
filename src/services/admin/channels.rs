use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AdminService;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode, chat::requests::CreateChannelRequest};
use crate::services::chat::hub;
use crate::services::{bad_request, error_response, not_found, unauthorized};
use crate::utils::validate::validate_title;

const CHANNEL_NAME_MAX_LENGTH: usize = 50;

pub async fn create_channel(
    service: &AdminService,
    mut body: CreateChannelRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(admin_id) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized());
    };

    if let Err(msg) = validate_title(&body.name, "Channel name", CHANNEL_NAME_MAX_LENGTH) {
        return Ok(bad_request(ErrorCode::InvalidParameter, msg));
    }
    body.name = body.name.trim().to_string();

    match storage.create_channel(admin_id, body).await {
        Ok(channel) => {
            tracing::info!("Chat channel {} ({}) created", channel.id, channel.name);
            Ok(HttpResponse::Created().json(ApiResponse::success(channel, "Channel created")))
        }
        Err(e) => Ok(error_response(&e, ErrorCode::ChannelAlreadyExists)),
    }
}

/// 停用后断开该频道的订阅者
pub async fn deactivate_channel(
    service: &AdminService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.set_channel_active(id, false).await {
        Ok(Some(channel)) => {
            hub::close_channel(id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(channel, "Channel deactivated")))
        }
        Ok(None) => Ok(not_found(ErrorCode::ChannelNotFound, "Channel not found")),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}
