//! Single-slot user account
//!
//! The document holds at most one user. Passwords are stored and compared
//! as plain text.

use crate::error::{DictionaryError, DictionaryResult};
use crate::models::{Document, User, UserProfile};

/// Minimum password length, in characters
pub const MIN_PASSWORD_LEN: usize = 4;

/// The registered user without the password, or `None` before registration
pub fn get_user(doc: &Document) -> Option<UserProfile> {
    if !doc.user.is_registered() {
        return None;
    }

    Some(UserProfile {
        username: doc.user.username.clone(),
    })
}

/// Register the one and only user
pub fn register(doc: &mut Document, username: &str, password: &str) -> DictionaryResult<()> {
    if username.is_empty() || password.chars().count() < MIN_PASSWORD_LEN {
        return Err(DictionaryError::Validation(format!(
            "username must not be empty and password needs at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }

    if doc.user.is_registered() {
        return Err(DictionaryError::AlreadyRegistered);
    }

    doc.user = User {
        username: username.to_string(),
        password: password.to_string(),
    };
    Ok(())
}

/// Check credentials against the stored user, returning the username
pub fn login(doc: &Document, username: &str, password: &str) -> DictionaryResult<String> {
    if !doc.user.is_registered() {
        return Err(DictionaryError::NotRegistered);
    }

    if username != doc.user.username || password != doc.user.password {
        return Err(DictionaryError::InvalidCredentials);
    }

    Ok(doc.user.username.clone())
}
