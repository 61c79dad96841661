//! HTTP handlers for conversations and messages

pub mod conversations;
pub mod messages;
