//! Domain entities for Conversations domain
//!
//! Conversations own an ordered set of messages. Each entity constructor
//! enforces the same rules the database CHECK constraints do.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use parley_common::{Error, Result};

/// Title shown while a conversation has no title of its own
pub const DEFAULT_TITLE: &str = "New Conversation";

/// Chatbot message seeded into every new conversation
pub const GREETING: &str = "Hello! I'm your assistant. How can I help you today?";

/// Maximum title length in characters (CHECK length(title) <= 200)
pub const MAX_TITLE_LENGTH: usize = 200;

/// Maximum message content length in characters
pub const MAX_CONTENT_LENGTH: usize = 10_000;

/// Derived titles keep at most this many characters of the message
const DERIVED_TITLE_LENGTH: usize = 50;

/// Conversation entity
///
/// `title` is `None` until the client sets one or it is derived from the
/// first user message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Conversation {
    pub id: Uuid,
    pub title: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Create a new conversation
    pub fn new(title: Option<String>) -> Result<Self> {
        if let Some(ref t) = title {
            validate_title(t)?;
        }

        let now = Utc::now();
        Ok(Conversation {
            id: Uuid::new_v4(),
            title,
            created_at: now,
            updated_at: now,
        })
    }

    /// Title to present to clients
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(DEFAULT_TITLE)
    }
}

/// Validate a client-supplied title (1..=200 characters, not blank)
pub fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(Error::invalid_field("title", "Title cannot be empty"));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(Error::invalid_field(
            "title",
            format!("Title must be at most {} characters", MAX_TITLE_LENGTH),
        ));
    }
    Ok(())
}

/// Derive a display title from message content.
///
/// Whitespace runs collapse to single spaces; content longer than
/// 50 characters is cut at a character boundary and suffixed with `...`.
/// Returns `None` when nothing printable remains.
pub fn derive_title(content: &str) -> Option<String> {
    let collapsed = content.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return None;
    }

    if collapsed.chars().count() <= DERIVED_TITLE_LENGTH {
        return Some(collapsed);
    }

    let head: String = collapsed.chars().take(DERIVED_TITLE_LENGTH).collect();
    Some(format!("{}...", head.trim_end()))
}

/// Message entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Message {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub content: String,
    pub is_from_user: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Message {
    /// Create a new message; content is kept verbatim
    pub fn new(conversation_id: Uuid, content: String, is_from_user: bool) -> Result<Self> {
        Self::validate_content(&content)?;

        let now = Utc::now();
        Ok(Message {
            id: Uuid::new_v4(),
            conversation_id,
            content,
            is_from_user,
            created_at: now,
            updated_at: now,
        })
    }

    /// The chatbot greeting that opens a conversation
    pub fn greeting(conversation_id: Uuid, at: DateTime<Utc>) -> Self {
        Message {
            id: Uuid::new_v4(),
            conversation_id,
            content: GREETING.to_string(),
            is_from_user: false,
            created_at: at,
            updated_at: at,
        }
    }

    /// Validate message content (CHECK (length(trim(content)) > 0))
    fn validate_content(content: &str) -> Result<()> {
        if content.trim().is_empty() {
            return Err(Error::invalid_field("content", "Content cannot be empty"));
        }
        if content.chars().count() > MAX_CONTENT_LENGTH {
            return Err(Error::invalid_field(
                "content",
                format!("Content must be at most {} characters", MAX_CONTENT_LENGTH),
            ));
        }
        Ok(())
    }
}

/// Conversation row annotated with its latest message and message count
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct ConversationSummary {
    pub id: Uuid,
    pub title: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_message: Option<String>,
    pub message_count: i64,
}

impl ConversationSummary {
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(DEFAULT_TITLE)
    }
}

/// Conversation together with its messages, oldest first
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationThread {
    pub conversation: Conversation,
    pub messages: Vec<Message>,
}

/// Message together with the conversation that owns it
#[derive(Debug, Clone, PartialEq)]
pub struct MessageWithConversation {
    pub message: Message,
    pub conversation: Conversation,
}
