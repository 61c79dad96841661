//! Message service: paginated listing and transactional creation

use chrono::Utc;
use parley_common::{Error, PageInfo, PageRequest, Result};
use tracing::info;
use uuid::Uuid;

use super::conversations::{conversation_not_found, ConversationService};
use crate::domain::entities::{Message, MessageWithConversation};
use crate::repository::transactions::{
    create_message_tx, find_conversation_tx, touch_conversation_tx,
};
use crate::repository::ConversationsRepositories;

/// Input for posting a message
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub conversation_id: Uuid,
    pub content: String,
    pub is_from_user: bool,
}

fn message_not_found() -> Error {
    Error::NotFound("Message not found".to_string())
}

#[derive(Clone)]
pub struct MessageService {
    repos: ConversationsRepositories,
    conversations: ConversationService,
}

impl MessageService {
    pub fn new(repos: ConversationsRepositories, conversations: ConversationService) -> Self {
        Self {
            repos,
            conversations,
        }
    }

    /// Page of a conversation's messages, newest first
    pub async fn list_by_conversation(
        &self,
        conversation_id: Uuid,
        page: PageRequest,
    ) -> Result<(Vec<Message>, PageInfo)> {
        if self.repos.conversations.find(conversation_id).await?.is_none() {
            return Err(conversation_not_found());
        }

        let total_count = self.repos.messages.count_by_conversation(conversation_id).await?;
        let messages = self
            .repos
            .messages
            .page_by_conversation(conversation_id, page.limit, page.offset())
            .await?;

        Ok((messages, PageInfo::new(page, total_count)))
    }

    /// Post a message.
    ///
    /// The insert, title derivation and conversation touch commit together;
    /// any failure leaves the store unchanged.
    pub async fn create(&self, input: NewMessage) -> Result<Message> {
        let NewMessage {
            conversation_id,
            content,
            is_from_user,
        } = input;

        let mut tx = self.repos.begin().await?;
        if find_conversation_tx(&mut tx, conversation_id).await?.is_none() {
            return Err(conversation_not_found());
        }

        let message = Message::new(conversation_id, content, is_from_user)?;
        let created = create_message_tx(&mut tx, &message).await?;

        if created.is_from_user {
            self.conversations
                .derive_title_from_first_message(&mut tx, conversation_id, &created.content)
                .await?;
        }

        touch_conversation_tx(&mut tx, conversation_id, created.created_at.max(Utc::now())).await?;
        tx.commit().await?;

        info!(
            message_id = %created.id,
            %conversation_id,
            is_from_user = created.is_from_user,
            "Message created"
        );
        Ok(created)
    }

    /// Message together with its parent conversation
    pub async fn get_by_id(&self, id: Uuid) -> Result<MessageWithConversation> {
        let message = self
            .repos
            .messages
            .find(id)
            .await?
            .ok_or_else(message_not_found)?;

        let conversation = self
            .repos
            .conversations
            .find(message.conversation_id)
            .await?
            .ok_or_else(message_not_found)?;

        Ok(MessageWithConversation {
            message,
            conversation,
        })
    }
}
