//! 频道广播中心
//!
//! 每个频道一个 `broadcast` 发送端，WebSocket 会话订阅自己所在的频道。
//! 只保证进程内投递，接收端落后时丢弃消息。

use dashmap::DashMap;
use once_cell::sync::Lazy;
use tokio::sync::broadcast;

use crate::models::chat::entities::ServerFrame;

const CHANNEL_CAPACITY: usize = 100;

static CHANNEL_HUB: Lazy<ChannelHub> = Lazy::new(ChannelHub::new);

pub struct ChannelHub {
    /// 频道 ID -> 广播发送器
    channels: DashMap<i64, broadcast::Sender<ServerFrame>>,
}

impl ChannelHub {
    fn new() -> Self {
        Self {
            channels: DashMap::new(),
        }
    }

    pub fn get() -> &'static Self {
        &CHANNEL_HUB
    }

    pub fn subscribe(&self, channel_id: i64) -> broadcast::Receiver<ServerFrame> {
        let entry = self.channels.entry(channel_id).or_insert_with(|| {
            let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
            tx
        });
        entry.subscribe()
    }

    /// 返回收到消息的订阅者数量
    pub fn publish(&self, channel_id: i64, frame: ServerFrame) -> usize {
        self.channels
            .get(&channel_id)
            .and_then(|sender| sender.send(frame).ok())
            .unwrap_or(0)
    }

    /// 没有订阅者时移除频道
    pub fn unregister(&self, channel_id: i64) {
        self.channels
            .remove_if(&channel_id, |_, sender| sender.receiver_count() == 0);
    }

    /// 丢弃发送端，所有订阅者收到 Closed
    pub fn close(&self, channel_id: i64) {
        self.channels.remove(&channel_id);
    }

    pub fn subscriber_count(&self, channel_id: i64) -> usize {
        self.channels
            .get(&channel_id)
            .map_or(0, |sender| sender.receiver_count())
    }
}

pub fn close_channel(channel_id: i64) {
    ChannelHub::get().close(channel_id);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn test_publish_reaches_subscribers_until_closed() {
        let hub = ChannelHub::new();
        assert_eq!(hub.publish(1, ServerFrame::Pong), 0);

        let mut first = hub.subscribe(1);
        let mut second = hub.subscribe(1);
        let _other = hub.subscribe(2);
        assert_eq!(hub.subscriber_count(1), 2);

        assert_eq!(hub.publish(1, ServerFrame::Pong), 2);
        assert!(matches!(first.recv().await, Ok(ServerFrame::Pong)));
        assert!(matches!(second.recv().await, Ok(ServerFrame::Pong)));

        hub.close(1);
        assert!(matches!(
            first.recv().await,
            Err(broadcast::error::RecvError::Closed)
        ));
        assert_eq!(hub.subscriber_count(2), 1);
    }

    #[test]
    fn test_unregister_keeps_channels_with_subscribers() {
        let hub = ChannelHub::new();
        let rx = hub.subscribe(7);
        hub.unregister(7);
        assert_eq!(hub.subscriber_count(7), 1);

        drop(rx);
        hub.unregister(7);
        assert!(hub.channels.get(&7).is_none());
    }
}
