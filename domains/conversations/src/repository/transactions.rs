//! Transaction helpers for Conversations domain

use super::conversations::CONVERSATION_COLUMNS;
use super::messages::MESSAGE_COLUMNS;
use crate::domain::entities::{Conversation, Message};
use chrono::{DateTime, Utc};
use parley_common::RepositoryError;
use sqlx::{Sqlite, Transaction};
use uuid::Uuid;

/// Find a conversation within a transaction
pub async fn find_conversation_tx(
    tx: &mut Transaction<'_, Sqlite>,
    id: Uuid,
) -> Result<Option<Conversation>, sqlx::Error> {
    let query = format!("SELECT {CONVERSATION_COLUMNS} FROM conversations WHERE id = ?1");
    sqlx::query_as::<_, Conversation>(&query)
        .bind(id)
        .fetch_optional(&mut **tx)
        .await
}

/// Create a conversation within a transaction
pub async fn create_conversation_tx(
    tx: &mut Transaction<'_, Sqlite>,
    conv: &Conversation,
) -> Result<Conversation, sqlx::Error> {
    let query = format!(
        "INSERT INTO conversations (id, title, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4) \
         RETURNING {CONVERSATION_COLUMNS}"
    );
    sqlx::query_as::<_, Conversation>(&query)
        .bind(conv.id)
        .bind(&conv.title)
        .bind(conv.created_at)
        .bind(conv.updated_at)
        .fetch_one(&mut **tx)
        .await
}

/// Create a message within a transaction
pub async fn create_message_tx(
    tx: &mut Transaction<'_, Sqlite>,
    msg: &Message,
) -> Result<Message, sqlx::Error> {
    let query = format!(
        "INSERT INTO messages (id, conversation_id, content, is_from_user, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6) \
         RETURNING {MESSAGE_COLUMNS}"
    );
    sqlx::query_as::<_, Message>(&query)
        .bind(msg.id)
        .bind(msg.conversation_id)
        .bind(&msg.content)
        .bind(msg.is_from_user)
        .bind(msg.created_at)
        .bind(msg.updated_at)
        .fetch_one(&mut **tx)
        .await
}

/// Set the title of a conversation that has none yet.
///
/// Returns `false` when the conversation already carries a title, so a
/// title is only ever derived once.
pub async fn set_title_if_unset_tx(
    tx: &mut Transaction<'_, Sqlite>,
    id: Uuid,
    title: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE conversations SET title = ?2 WHERE id = ?1 AND title IS NULL")
        .bind(id)
        .bind(title)
        .execute(&mut **tx)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Bump `updated_at` to at least `at` within an existing transaction.
///
/// Returns `RepositoryError::NotFound` if the conversation does not exist.
pub async fn touch_conversation_tx(
    tx: &mut Transaction<'_, Sqlite>,
    id: Uuid,
    at: DateTime<Utc>,
) -> Result<(), RepositoryError> {
    let result = sqlx::query(
        "UPDATE conversations SET updated_at = MAX(updated_at, ?2) WHERE id = ?1",
    )
    .bind(id)
    .bind(at)
    .execute(&mut **tx)
    .await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }
    Ok(())
}
