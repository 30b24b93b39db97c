use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/chat.ts")]
pub struct CreateChannelRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/chat.ts")]
pub struct MessageHistoryParams {
    pub limit: Option<u64>,
    /// 只返回 id 小于该值的消息，用于向前翻页
    pub before_id: Option<i64>,
}

// WebSocket 连接参数；浏览器无法设置请求头，令牌放在查询串里
#[derive(Debug, Deserialize)]
pub struct ChatConnectParams {
    pub token: String,
    pub channel_id: i64,
}
