//! Services for the Conversations domain
//!
//! Built once at startup and shared through [`crate::ConversationsState`].

pub mod conversations;
pub mod messages;

pub use conversations::{
    ConversationChanges, ConversationService, DeletedConversation, NewConversation,
};
pub use messages::{MessageService, NewMessage};
