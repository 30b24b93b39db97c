pub mod chat_cleanup;
pub mod lifetime;
