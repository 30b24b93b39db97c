//! 单个 WebSocket 会话：接收客户端帧、持久化并广播、转发频道消息

use actix_ws::Message;
use futures_util::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use super::hub::ChannelHub;
use crate::models::chat::entities::{ClientFrame, ServerFrame};
use crate::models::users::entities::User;
use crate::storage::Storage;

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

/// 校验消息内容，返回去掉首尾空白后的文本
pub(crate) fn validate_message(content: &str, max_length: usize) -> Result<&str, String> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err("Message must not be empty".to_string());
    }
    if trimmed.chars().count() > max_length {
        return Err(format!("Message must be at most {max_length} characters"));
    }
    Ok(trimmed)
}

async fn send_frame(session: &mut actix_ws::Session, frame: &ServerFrame) -> bool {
    match serde_json::to_string(frame) {
        Ok(json) => session.text(json).await.is_ok(),
        Err(e) => {
            warn!("Failed to serialize chat frame: {e}");
            true
        }
    }
}

pub struct ChatSession {
    pub storage: Arc<dyn Storage>,
    pub user: User,
    pub channel_id: i64,
    pub max_message_length: usize,
}

impl ChatSession {
    /// 保存后广播给频道内所有订阅者（包括自己）
    async fn handle_text(&self, session: &mut actix_ws::Session, text: &str) -> bool {
        let frame = match serde_json::from_str::<ClientFrame>(text) {
            Ok(frame) => frame,
            Err(e) => {
                debug!("Invalid chat frame from user {}: {e}", self.user.id);
                let error = ServerFrame::Error {
                    message: "Invalid frame".to_string(),
                };
                return send_frame(session, &error).await;
            }
        };

        match frame {
            ClientFrame::Ping => send_frame(session, &ServerFrame::Pong).await,
            ClientFrame::Message { content } => {
                let content = match validate_message(&content, self.max_message_length) {
                    Ok(content) => content,
                    Err(message) => {
                        return send_frame(session, &ServerFrame::Error { message }).await;
                    }
                };

                match self
                    .storage
                    .create_chat_message(self.channel_id, self.user.id, &self.user.username, content)
                    .await
                {
                    Ok(message) => {
                        ChannelHub::get()
                            .publish(self.channel_id, ServerFrame::Message { payload: message });
                        true
                    }
                    Err(e) => {
                        warn!("Failed to persist chat message: {e}");
                        let error = ServerFrame::Error {
                            message: "Failed to send message".to_string(),
                        };
                        send_frame(session, &error).await
                    }
                }
            }
        }
    }

    pub async fn run(self, mut session: actix_ws::Session, mut stream: actix_ws::MessageStream) {
        let user_id = self.user.id;
        let channel_id = self.channel_id;
        info!("Chat connected: user {user_id} in channel {channel_id}");

        let mut rx = ChannelHub::get().subscribe(channel_id);

        let connected = ServerFrame::Connected {
            channel_id,
            user_id,
        };
        let mut open = send_frame(&mut session, &connected).await;

        let mut heartbeat = tokio::time::interval(HEARTBEAT_INTERVAL);
        // 第一次 tick 立即返回
        heartbeat.tick().await;

        while open {
            tokio::select! {
                msg = stream.next() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => {
                            open = self.handle_text(&mut session, &text).await;
                        }
                        Some(Ok(Message::Ping(data))) => {
                            open = session.pong(&data).await.is_ok();
                        }
                        Some(Ok(Message::Close(_))) | None => {
                            open = false;
                        }
                        Some(Err(e)) => {
                            warn!("WebSocket error for user {user_id}: {e:?}");
                            open = false;
                        }
                        _ => {}
                    }
                }

                frame = rx.recv() => {
                    match frame {
                        Ok(frame) => {
                            open = send_frame(&mut session, &frame).await;
                        }
                        Err(broadcast::error::RecvError::Lagged(n)) => {
                            warn!("Chat receiver for user {user_id} lagged by {n} messages");
                        }
                        // 频道被停用
                        Err(broadcast::error::RecvError::Closed) => {
                            let closing = ServerFrame::Error {
                                message: "Channel closed".to_string(),
                            };
                            send_frame(&mut session, &closing).await;
                            open = false;
                        }
                    }
                }

                _ = heartbeat.tick() => {
                    open = session.ping(b"").await.is_ok();
                }
            }
        }

        let _ = session.close(None).await;
        drop(rx);
        ChannelHub::get().unregister(channel_id);
        info!("Chat disconnected: user {user_id} from channel {channel_id}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_message() {
        assert_eq!(validate_message("  안녕하세요 ", 10), Ok("안녕하세요"));
        assert!(validate_message("   ", 10).is_err());
        assert!(validate_message("abcdef", 5).unwrap_err().contains("at most 5"));
    }
}
