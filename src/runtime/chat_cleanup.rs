//! 聊天消息定期清理

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::storage::Storage;

/// 删除超过保留期的消息，返回删除条数
pub async fn purge_expired_messages(storage: &Arc<dyn Storage>, retention_secs: i64) -> u64 {
    let cutoff = chrono::Utc::now().timestamp() - retention_secs;
    match storage.delete_chat_messages_before(cutoff).await {
        Ok(0) => {
            debug!("Chat cleanup: nothing to remove");
            0
        }
        Ok(removed) => {
            info!("Chat cleanup removed {} message(s)", removed);
            removed
        }
        Err(e) => {
            warn!("Chat cleanup failed: {}", e);
            0
        }
    }
}

/// 后台定时任务，随进程退出
pub fn spawn_chat_cleanup(storage: Arc<dyn Storage>) -> tokio::task::JoinHandle<()> {
    let chat = &AppConfig::get().chat;
    let retention = chat.message_retention_secs;
    let period = Duration::from_secs(chat.cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            purge_expired_messages(&storage, retention).await;
        }
    })
}
