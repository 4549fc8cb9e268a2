//! Dictionary operation errors

use thiserror::Error;

/// Errors returned by entry and account operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DictionaryError {
    /// A required field is empty or too short
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Another entry already uses this word (ignoring case)
    #[error("Word '{word}' already exists")]
    Duplicate { word: String },

    /// Position is outside 1..=count
    #[error("No entry at position {position} (dictionary has {count})")]
    OutOfRange { position: usize, count: usize },

    /// A user is already registered
    #[error("A user is already registered")]
    AlreadyRegistered,

    /// Nobody has registered yet
    #[error("No user registered, register first")]
    NotRegistered,

    /// Username or password does not match the stored user
    #[error("Invalid username or password")]
    InvalidCredentials,
}

/// Result type for dictionary operations
pub type DictionaryResult<T> = Result<T, DictionaryError>;
