//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。

pub mod prelude;

pub mod cart_items;
pub mod chat_channels;
pub mod chat_messages;
pub mod courses;
pub mod enrollments;
pub mod instructors;
pub mod notices;
pub mod payments;
pub mod reviews;
pub mod seminar_applications;
pub mod seminars;
pub mod source_materials;
pub mod users;
pub mod workbooks;

use chrono::{DateTime, Utc};

/// unix 秒转换为 UTC 时间
pub(crate) fn to_datetime(ts: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()
}
