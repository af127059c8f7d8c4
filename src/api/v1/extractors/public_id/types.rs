/**
 * Responsibility
 *  - One tagged id type per resource exposed with a public id
 *
 * Everything `pub` here is re-exported through ./mod.rs.
 */
use super::core::PublicId;

// conversations
pub enum ConversationTag {}
pub type PublicConversationId = PublicId<ConversationTag>;
