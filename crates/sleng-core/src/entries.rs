//! Entry operations over an in-memory document
//!
//! Everything here works on a `Document` snapshot. Callers persist the
//! document through `DocumentStore` right after a successful mutation.
//! Entries have no stable id; a position is the 1-based index in the
//! current listing and shifts when an earlier entry is deleted.

use crate::error::{DictionaryError, DictionaryResult};
use crate::models::{Document, Entry};

/// All entries in stored order
pub fn list(doc: &Document) -> &[Entry] {
    &doc.entries
}

/// Find the entry whose word matches ignoring case
pub fn find_word<'a>(doc: &'a Document, word: &str) -> Option<&'a Entry> {
    let wanted = word.trim().to_lowercase();
    doc.entries
        .iter()
        .find(|e| e.word.trim().to_lowercase() == wanted)
}

/// Append a new entry
///
/// Word and meaning are trimmed before storing; synonyms are trimmed and
/// empty pieces dropped.
pub fn add(doc: &mut Document, candidate: Entry) -> DictionaryResult<()> {
    let word = candidate.word.trim();
    let meaning = candidate.meaning.trim();

    if word.is_empty() || meaning.is_empty() {
        return Err(DictionaryError::Validation(
            "word and meaning are required".to_string(),
        ));
    }

    if find_word(doc, word).is_some() {
        return Err(DictionaryError::Duplicate {
            word: word.to_string(),
        });
    }

    let entry = Entry {
        word: word.to_string(),
        meaning: meaning.to_string(),
        synonyms: candidate
            .synonyms
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        ..candidate
    };

    doc.entries.push(entry);
    Ok(())
}

/// Remove the entry at a 1-based position and return it
pub fn delete_at(doc: &mut Document, position: usize) -> DictionaryResult<Entry> {
    let count = doc.entries.len();
    if position < 1 || position > count {
        return Err(DictionaryError::OutOfRange { position, count });
    }

    Ok(doc.entries.remove(position - 1))
}

/// Split a comma-separated line of synonyms
pub fn parse_synonyms(text: &str) -> Vec<String> {
    text.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
