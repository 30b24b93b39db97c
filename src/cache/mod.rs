//! 对象缓存
//!
//! 通过插件注册表按名称选择后端（`moka` 内存缓存或 `redis`），
//! 目前主要用于缓存 JWT 对应的用户信息。

pub mod object_cache;
pub mod register;
pub mod traits;

pub use traits::{CacheResult, ObjectCache};
