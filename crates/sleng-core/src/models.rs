//! Data models for sleng
//!
//! Defines the persisted structures: Entry, User and the Document that
//! holds both. The serde layout is the on-disk and on-the-wire format.

use serde::{Deserialize, Deserializer, Serialize};

/// Version tag written into new documents
pub const DOCUMENT_VERSION: &str = "1.0";

/// One slang term
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Entry {
    /// The term itself, unique ignoring case
    #[serde(default, deserialize_with = "null_as_default")]
    pub word: String,
    /// What the term means
    #[serde(default, deserialize_with = "null_as_default")]
    pub meaning: String,
    /// Usage example
    #[serde(default, deserialize_with = "null_as_default")]
    pub example: String,
    /// Where the term comes from (omitted when empty)
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub origin: String,
    /// Related words (omitted when empty)
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub synonyms: Vec<String>,
}

impl Entry {
    /// Create an entry with only the required fields set
    pub fn new(word: impl Into<String>, meaning: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            meaning: meaning.into(),
            ..Self::default()
        }
    }

    /// Set the usage example
    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.example = example.into();
        self
    }

    /// Set the origin
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    /// Set the synonyms
    pub fn with_synonyms(mut self, synonyms: Vec<String>) -> Self {
        self.synonyms = synonyms;
        self
    }
}

/// The single registered user
///
/// The password is kept verbatim; nothing here is hashed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    #[serde(default, deserialize_with = "null_as_default")]
    pub username: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub password: String,
}

impl User {
    /// An empty username means nobody has registered yet
    pub fn is_registered(&self) -> bool {
        !self.username.is_empty()
    }
}

/// Publicly visible part of the user record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    pub username: String,
}

/// The persisted dictionary document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Document {
    #[serde(default, deserialize_with = "null_as_default")]
    pub user: User,
    #[serde(default = "default_version", deserialize_with = "null_as_version")]
    pub version: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub entries: Vec<Entry>,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            user: User::default(),
            version: default_version(),
            entries: Vec::new(),
        }
    }
}

fn default_version() -> String {
    DOCUMENT_VERSION.to_string()
}

/// Read `null` the same as a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

fn null_as_version<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(|v| v.unwrap_or_else(default_version))
}
