pub mod auth;
pub mod chat_store;
pub mod id_codec;
