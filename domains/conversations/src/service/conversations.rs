//! Conversation service: CRUD, list summaries, title derivation

use chrono::Utc;
use parley_common::{Error, PageInfo, PageRequest, Result};
use sqlx::{Sqlite, Transaction};
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::entities::{
    derive_title, validate_title, Conversation, ConversationSummary, ConversationThread, Message,
};
use crate::repository::transactions::{
    create_conversation_tx, create_message_tx, set_title_if_unset_tx,
};
use crate::repository::ConversationsRepositories;

/// Input for creating a conversation
#[derive(Debug, Clone, Default)]
pub struct NewConversation {
    pub title: Option<String>,
}

/// Partial update of a conversation; `None` fields are left untouched
#[derive(Debug, Clone, Default)]
pub struct ConversationChanges {
    pub title: Option<String>,
}

/// Confirmation of a deleted conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeletedConversation {
    pub id: Uuid,
}

pub(crate) fn conversation_not_found() -> Error {
    Error::NotFound("Conversation not found".to_string())
}

#[derive(Clone)]
pub struct ConversationService {
    repos: ConversationsRepositories,
}

impl ConversationService {
    pub fn new(repos: ConversationsRepositories) -> Self {
        Self { repos }
    }

    /// Page of conversations, most recently active first
    pub async fn get_all(&self, page: PageRequest) -> Result<(Vec<ConversationSummary>, PageInfo)> {
        let total_count = self.repos.conversations.count().await?;
        let conversations = self
            .repos
            .conversations
            .list_summaries(page.limit, page.offset())
            .await?;

        Ok((conversations, PageInfo::new(page, total_count)))
    }

    /// Conversation with all its messages, oldest first
    pub async fn get_by_id(&self, id: Uuid) -> Result<ConversationThread> {
        let conversation = self
            .repos
            .conversations
            .find(id)
            .await?
            .ok_or_else(conversation_not_found)?;

        let messages = self.repos.messages.list_by_conversation(id).await?;
        Ok(ConversationThread {
            conversation,
            messages,
        })
    }

    /// Create a conversation seeded with the chatbot greeting
    pub async fn create(&self, input: NewConversation) -> Result<ConversationThread> {
        let conversation = Conversation::new(input.title)?;
        let greeting = Message::greeting(conversation.id, conversation.created_at);

        let mut tx = self.repos.begin().await?;
        let conversation = create_conversation_tx(&mut tx, &conversation).await?;
        let greeting = create_message_tx(&mut tx, &greeting).await?;
        tx.commit().await?;

        info!(conversation_id = %conversation.id, "Conversation created");
        Ok(ConversationThread {
            conversation,
            messages: vec![greeting],
        })
    }

    /// Apply partial changes to a conversation
    pub async fn update(&self, id: Uuid, changes: ConversationChanges) -> Result<Conversation> {
        if let Some(ref title) = changes.title {
            validate_title(title)?;
        }

        let updated = self
            .repos
            .conversations
            .update(id, changes.title, Utc::now())
            .await?
            .ok_or_else(conversation_not_found)?;

        info!(conversation_id = %id, "Conversation updated");
        Ok(updated)
    }

    /// Delete a conversation and, by cascade, its messages
    pub async fn delete(&self, id: Uuid) -> Result<DeletedConversation> {
        if !self.repos.conversations.delete(id).await? {
            return Err(conversation_not_found());
        }

        info!(conversation_id = %id, "Conversation deleted");
        Ok(DeletedConversation { id })
    }

    /// Title the conversation after `content` unless it already has a title.
    ///
    /// Runs inside the caller's transaction. Returns the title that was set,
    /// or `None` when the conversation kept its existing one.
    pub async fn derive_title_from_first_message(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        conversation_id: Uuid,
        content: &str,
    ) -> Result<Option<String>> {
        let Some(title) = derive_title(content) else {
            return Ok(None);
        };

        if !set_title_if_unset_tx(tx, conversation_id, &title).await? {
            return Ok(None);
        }

        debug!(%conversation_id, %title, "Conversation title derived from first message");
        Ok(Some(title))
    }
}
