//! Conversations domain: chat threads, messages

pub mod api;
pub mod domain;
pub mod repository;
pub mod service;

// Re-export domain types at the crate root for convenience
pub use domain::entities::{
    Conversation, ConversationSummary, ConversationThread, Message, MessageWithConversation,
};

// Re-export repository types
pub use repository::{ConversationRepository, ConversationsRepositories, MessageRepository};

// Re-export service types
pub use service::{ConversationService, MessageService};

// Re-export API types
pub use api::routes;
pub use api::ConversationsState;
