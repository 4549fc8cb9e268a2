//! Storage layer
//!
//! Persists the dictionary document as a single JSON file.
//!
//! ## Architecture
//!
//! - **DocumentStore**: owns the file path and the reader/writer lock
//! - **StorageError**: typed I/O and format failures
//!
//! There is no cache. Every operation loads the whole document, and
//! every mutation writes the whole document back.

pub mod error;
pub mod persistence;

pub use error::{StorageError, StorageResult};
pub use persistence::DocumentStore;
