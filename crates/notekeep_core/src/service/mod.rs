//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Translate repository errors into the `CoreError` vocabulary.

pub mod collaboration_service;
pub mod credential_store;
pub mod note_registry;
pub mod password;
