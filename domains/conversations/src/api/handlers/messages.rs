//! Message API handlers

use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use parley_common::{
    extractors::{validate_identifier, validate_not_blank},
    ApiResponse, Error, PageQuery, Result, ValidatedJson, ValidatedPath, ValidatedQuery,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::conversations::ConversationResponse;
use crate::api::middleware::ConversationsState;
use crate::domain::entities::{Message, MessageWithConversation};
use crate::service::NewMessage;

/// Page size when the client does not ask for one
pub const DEFAULT_MESSAGES_LIMIT: i64 = 50;

fn default_is_from_user() -> bool {
    true
}

/// Request for posting a message
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMessageRequest {
    #[validate(
        required(message = "Content is required"),
        custom(function = "validate_not_blank", message = "Content cannot be empty"),
        length(max = 10000, message = "Content must be at most 10000 characters")
    )]
    pub content: Option<String>,

    #[serde(rename = "conversationId")]
    #[validate(
        required(message = "Conversation ID is required"),
        custom(function = "validate_identifier", message = "Invalid conversation ID format")
    )]
    pub conversation_id: Option<String>,

    /// Defaults to a user-authored message
    #[serde(rename = "isFromUser", default = "default_is_from_user")]
    pub is_from_user: bool,
}

/// Message response DTO
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub id: Uuid,
    pub content: String,
    pub is_from_user: bool,
    pub conversation_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Message> for MessageResponse {
    fn from(m: Message) -> Self {
        Self {
            id: m.id,
            content: m.content,
            is_from_user: m.is_from_user,
            conversation_id: m.conversation_id,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Message together with its parent conversation
#[derive(Debug, Serialize)]
pub struct MessageDetailResponse {
    #[serde(flatten)]
    pub message: MessageResponse,
    pub conversation: ConversationResponse,
}

impl From<MessageWithConversation> for MessageDetailResponse {
    fn from(m: MessageWithConversation) -> Self {
        Self {
            message: m.message.into(),
            conversation: m.conversation.into(),
        }
    }
}

/// Post a message to a conversation
pub async fn create_message(
    State(state): State<ConversationsState>,
    ValidatedJson(req): ValidatedJson<CreateMessageRequest>,
) -> Result<(StatusCode, Json<ApiResponse<MessageResponse>>)> {
    let conversation_id = req
        .conversation_id
        .as_deref()
        .and_then(|id| Uuid::parse_str(id).ok())
        .ok_or_else(|| Error::invalid_field("conversationId", "Invalid conversation ID format"))?;
    let content = req
        .content
        .ok_or_else(|| Error::invalid_field("content", "Content is required"))?;

    let message = state
        .messages
        .create(NewMessage {
            conversation_id,
            content,
            is_from_user: req.is_from_user,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(message.into()))))
}

/// List a conversation's messages, newest first
pub async fn list_messages(
    State(state): State<ConversationsState>,
    ValidatedPath(conversation_id): ValidatedPath<Uuid>,
    ValidatedQuery(query): ValidatedQuery<PageQuery>,
) -> Result<Json<ApiResponse<Vec<MessageResponse>>>> {
    let page = query.resolve(DEFAULT_MESSAGES_LIMIT);
    let (messages, pagination) = state
        .messages
        .list_by_conversation(conversation_id, page)
        .await?;

    let responses = messages.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::paginated(responses, pagination)))
}

/// Get a single message with its conversation
pub async fn get_message(
    State(state): State<ConversationsState>,
    ValidatedPath(id): ValidatedPath<Uuid>,
) -> Result<Json<ApiResponse<MessageDetailResponse>>> {
    let found = state.messages.get_by_id(id).await?;
    Ok(Json(ApiResponse::ok(found.into())))
}
