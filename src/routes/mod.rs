pub mod admin;

pub mod auth;

pub mod business;

pub mod catalog;

pub mod chat;

pub mod user;

pub use admin::configure_admin_routes;
pub use auth::configure_auth_routes;
pub use business::configure_business_routes;
pub use catalog::configure_catalog_routes;
pub use chat::configure_chat_routes;
pub use user::configure_user_routes;
