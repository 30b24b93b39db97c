use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/chat.ts")]
pub struct ChatChannel {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_by: i64,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/chat.ts")]
pub struct ChatMessage {
    pub id: i64,
    pub channel_id: i64,
    pub user_id: i64,
    pub username: String,
    pub content: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// 客户端发来的帧
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientFrame {
    Message { content: String },
    Ping,
}

/// 服务端推送的帧
#[derive(Debug, Clone, Serialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/chat.ts")]
pub enum ServerFrame {
    Connected { channel_id: i64, user_id: i64 },
    Message { payload: ChatMessage },
    Pong,
    Error { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_frames() {
        let f: ClientFrame = serde_json::from_str(r#"{"type":"message","content":"안녕"}"#).unwrap();
        assert_eq!(
            f,
            ClientFrame::Message {
                content: "안녕".into()
            }
        );
        let p: ClientFrame = serde_json::from_str(r#"{"type":"ping"}"#).unwrap();
        assert_eq!(p, ClientFrame::Ping);
        assert!(serde_json::from_str::<ClientFrame>(r#"{"type":"shout"}"#).is_err());
    }

    #[test]
    fn test_server_frame_shape() {
        let json = serde_json::to_value(ServerFrame::Pong).unwrap();
        assert_eq!(json["type"], "pong");
        let json = serde_json::to_value(ServerFrame::Connected {
            channel_id: 3,
            user_id: 9,
        })
        .unwrap();
        assert_eq!(json["type"], "connected");
        assert_eq!(json["channel_id"], 3);
    }
}
