//! sleng Core Library
//!
//! This crate provides the core functionality for sleng, a single-user
//! slang dictionary kept in one local JSON document.
//!
//! # Architecture
//!
//! - **DocumentStore**: the only way to read or write the document file
//! - **entries / account**: pure operations over a loaded `Document`
//! - **api**: HTTP endpoints built on the same operations
//!
//! Every operation reloads the full document, mutates it and saves it
//! back. There is no in-memory cache.
//!
//! # Quick Start
//!
//! ```text
//! let config = Config::load()?;
//! let store = DocumentStore::open(&config);
//!
//! let mut doc = store.load();
//! entries::add(&mut doc, Entry::new("rizz", "charisma"))?;
//! store.save(&doc);
//! ```
//!
//! # Modules
//!
//! - `config`: Application configuration
//! - `models`: Entry, User and Document
//! - `entries`: list / add / delete by position
//! - `account`: single-user register and login
//! - `storage`: JSON persistence behind a reader/writer lock
//! - `api`: HTTP router and server

pub mod account;
pub mod api;
pub mod config;
pub mod entries;
pub mod error;
pub mod models;
pub mod storage;

pub use config::Config;
pub use error::{DictionaryError, DictionaryResult};
pub use models::{Document, Entry, User, UserProfile};
pub use storage::{DocumentStore, StorageError, StorageResult};
