//! Conversation repository

use crate::domain::entities::{Conversation, ConversationSummary};
use chrono::{DateTime, Utc};
use parley_common::Result;
use sqlx::SqlitePool;
use uuid::Uuid;

pub(crate) const CONVERSATION_COLUMNS: &str = "id, title, created_at, updated_at";

#[derive(Clone)]
pub struct ConversationRepository {
    pool: SqlitePool,
}

impl ConversationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find conversation by ID
    pub async fn find(&self, id: Uuid) -> Result<Option<Conversation>> {
        let query = format!("SELECT {CONVERSATION_COLUMNS} FROM conversations WHERE id = ?1");
        let conv = sqlx::query_as::<_, Conversation>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(conv)
    }

    /// List a window of conversations, most recently active first, each with
    /// its latest message content and message count
    pub async fn list_summaries(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ConversationSummary>> {
        let summaries = sqlx::query_as::<_, ConversationSummary>(
            r#"
            SELECT c.id, c.title, c.created_at, c.updated_at,
                   (SELECT m.content FROM messages m
                     WHERE m.conversation_id = c.id
                     ORDER BY m.created_at DESC, m.rowid DESC
                     LIMIT 1) AS last_message,
                   (SELECT COUNT(*) FROM messages m
                     WHERE m.conversation_id = c.id) AS message_count
            FROM conversations c
            ORDER BY c.updated_at DESC, c.created_at DESC, c.rowid DESC
            LIMIT ?1 OFFSET ?2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(summaries)
    }

    /// Count all conversations
    pub async fn count(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM conversations")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Update the title (when given) and bump `updated_at`
    pub async fn update(
        &self,
        id: Uuid,
        title: Option<String>,
        at: DateTime<Utc>,
    ) -> Result<Option<Conversation>> {
        let query = format!(
            "UPDATE conversations SET \
                title = COALESCE(?2, title), \
                updated_at = MAX(updated_at, ?3) \
             WHERE id = ?1 \
             RETURNING {CONVERSATION_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Conversation>(&query)
            .bind(id)
            .bind(title)
            .bind(at)
            .fetch_optional(&self.pool)
            .await?;

        Ok(updated)
    }

    /// Delete a conversation; its messages cascade
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM conversations WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
