//! 数据模型定义
//!
//! 每个业务域分为 `entities`（业务实体）、`requests`（请求参数）和 `responses`（响应结构）。

pub mod applications;
pub mod auth;
pub mod cart;
pub mod chat;
pub mod common;
pub mod courses;
pub mod enrollments;
pub mod instructors;
pub mod materials;
pub mod notices;
pub mod payments;
pub mod reviews;
pub mod seminars;
pub mod users;
pub mod workbooks;

mod error_code;

pub use common::{
    ApiResponse, ItemType, MAX_PRICE, PaginationInfo, PaginationQuery, ProductRef,
    SetActiveRequest, effective_price, normalize_page, sum_prices, validate_price,
};
pub use error_code::ErrorCode;

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}
