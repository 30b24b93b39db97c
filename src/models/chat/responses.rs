use super::entities::{ChatChannel, ChatMessage};
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/chat.ts")]
pub struct ChannelListResponse {
    pub items: Vec<ChatChannel>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/chat.ts")]
pub struct MessageListResponse {
    pub items: Vec<ChatMessage>,
}
