//! Message repository

use crate::domain::entities::Message;
use parley_common::Result;
use sqlx::SqlitePool;
use uuid::Uuid;

pub(crate) const MESSAGE_COLUMNS: &str =
    "id, conversation_id, content, is_from_user, created_at, updated_at";

#[derive(Clone)]
pub struct MessageRepository {
    pool: SqlitePool,
}

impl MessageRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find message by ID
    pub async fn find(&self, id: Uuid) -> Result<Option<Message>> {
        let query = format!("SELECT {MESSAGE_COLUMNS} FROM messages WHERE id = ?1");
        let message = sqlx::query_as::<_, Message>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(message)
    }

    /// List every message of a conversation, oldest first
    pub async fn list_by_conversation(&self, conversation_id: Uuid) -> Result<Vec<Message>> {
        let query = format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages \
             WHERE conversation_id = ?1 \
             ORDER BY created_at ASC, rowid ASC"
        );
        let messages = sqlx::query_as::<_, Message>(&query)
            .bind(conversation_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(messages)
    }

    /// List a window of a conversation's messages, newest first
    pub async fn page_by_conversation(
        &self,
        conversation_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Message>> {
        let query = format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages \
             WHERE conversation_id = ?1 \
             ORDER BY created_at DESC, rowid DESC \
             LIMIT ?2 OFFSET ?3"
        );
        let messages = sqlx::query_as::<_, Message>(&query)
            .bind(conversation_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(messages)
    }

    /// Count the messages of a conversation
    pub async fn count_by_conversation(&self, conversation_id: Uuid) -> Result<i64> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM messages WHERE conversation_id = ?1")
                .bind(conversation_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}
