pub mod chat_repo;
pub mod conversation_repo;
pub mod error;
pub mod message_repo;
pub mod user_repo;

#[cfg(test)]
pub mod memory_user_repo;
#[cfg(test)]
pub mod memory_chat_repo;
