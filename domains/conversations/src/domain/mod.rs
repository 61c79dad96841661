//! Conversations domain layer: entities and title rules

pub mod entities;
