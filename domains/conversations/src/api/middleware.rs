//! Conversations domain state

use sqlx::SqlitePool;

use crate::repository::ConversationsRepositories;
use crate::service::{ConversationService, MessageService};

/// Application state for the Conversations domain
#[derive(Clone)]
pub struct ConversationsState {
    pub conversations: ConversationService,
    pub messages: MessageService,
}

impl ConversationsState {
    /// Wire repositories and services over a shared pool
    pub fn new(pool: SqlitePool) -> Self {
        let repos = ConversationsRepositories::new(pool);
        let conversations = ConversationService::new(repos.clone());
        let messages = MessageService::new(repos, conversations.clone());
        Self {
            conversations,
            messages,
        }
    }
}
