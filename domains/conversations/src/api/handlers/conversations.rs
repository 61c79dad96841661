//! Conversation management API handlers

use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use parley_common::{
    ApiResponse, PageQuery, Result, ValidatedJson, ValidatedPath, ValidatedQuery,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::messages::MessageResponse;
use crate::api::middleware::ConversationsState;
use crate::domain::entities::{Conversation, ConversationSummary, ConversationThread};
use crate::service::{ConversationChanges, DeletedConversation, NewConversation};

/// Page size when the client does not ask for one
pub const DEFAULT_CONVERSATIONS_LIMIT: i64 = 20;

/// Request for creating a conversation
#[derive(Debug, Deserialize, Validate)]
pub struct CreateConversationRequest {
    /// Optional conversation title; derived from the first user message otherwise
    #[validate(length(
        min = 1,
        max = 200,
        message = "Title must be between 1 and 200 characters"
    ))]
    pub title: Option<String>,
}

/// Request for updating a conversation
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateConversationRequest {
    #[validate(length(
        min = 1,
        max = 200,
        message = "Title must be between 1 and 200 characters"
    ))]
    pub title: Option<String>,
}

/// Conversation response DTO
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationResponse {
    pub id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Conversation> for ConversationResponse {
    fn from(c: Conversation) -> Self {
        Self {
            title: c.display_title().to_string(),
            id: c.id,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// List entry: conversation plus a preview of its latest message
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummaryResponse {
    pub id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_message: Option<String>,
    pub message_count: i64,
}

impl From<ConversationSummary> for ConversationSummaryResponse {
    fn from(s: ConversationSummary) -> Self {
        Self {
            title: s.display_title().to_string(),
            id: s.id,
            created_at: s.created_at,
            updated_at: s.updated_at,
            last_message: s.last_message,
            message_count: s.message_count,
        }
    }
}

/// Conversation with its messages, oldest first
#[derive(Debug, Serialize)]
pub struct ConversationDetailResponse {
    #[serde(flatten)]
    pub conversation: ConversationResponse,
    pub messages: Vec<MessageResponse>,
}

impl From<ConversationThread> for ConversationDetailResponse {
    fn from(t: ConversationThread) -> Self {
        Self {
            conversation: t.conversation.into(),
            messages: t.messages.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteConversationResponse {
    pub id: Uuid,
    pub deleted: bool,
}

impl From<DeletedConversation> for DeleteConversationResponse {
    fn from(d: DeletedConversation) -> Self {
        Self {
            id: d.id,
            deleted: true,
        }
    }
}

/// List conversations, most recently active first
pub async fn list_conversations(
    State(state): State<ConversationsState>,
    ValidatedQuery(query): ValidatedQuery<PageQuery>,
) -> Result<Json<ApiResponse<Vec<ConversationSummaryResponse>>>> {
    let page = query.resolve(DEFAULT_CONVERSATIONS_LIMIT);
    let (conversations, pagination) = state.conversations.get_all(page).await?;

    let responses = conversations.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::paginated(responses, pagination)))
}

/// Get a single conversation with all its messages
pub async fn get_conversation(
    State(state): State<ConversationsState>,
    ValidatedPath(id): ValidatedPath<Uuid>,
) -> Result<Json<ApiResponse<ConversationDetailResponse>>> {
    let thread = state.conversations.get_by_id(id).await?;
    Ok(Json(ApiResponse::ok(thread.into())))
}

/// Create a new conversation seeded with the chatbot greeting
pub async fn create_conversation(
    State(state): State<ConversationsState>,
    ValidatedJson(req): ValidatedJson<CreateConversationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ConversationDetailResponse>>)> {
    let thread = state
        .conversations
        .create(NewConversation { title: req.title })
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(thread.into()))))
}

/// Update a conversation's title
pub async fn update_conversation(
    State(state): State<ConversationsState>,
    ValidatedPath(id): ValidatedPath<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateConversationRequest>,
) -> Result<Json<ApiResponse<ConversationResponse>>> {
    let updated = state
        .conversations
        .update(id, ConversationChanges { title: req.title })
        .await?;

    Ok(Json(ApiResponse::ok(updated.into())))
}

/// Delete a conversation and all its messages
pub async fn delete_conversation(
    State(state): State<ConversationsState>,
    ValidatedPath(id): ValidatedPath<Uuid>,
) -> Result<Json<ApiResponse<DeleteConversationResponse>>> {
    let deleted = state.conversations.delete(id).await?;
    Ok(Json(
        ApiResponse::ok(deleted.into()).with_message("Conversation deleted successfully"),
    ))
}
