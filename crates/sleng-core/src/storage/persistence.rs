//! Dictionary document persistence
//!
//! Handles saving and loading the JSON document to/from the filesystem.
//! Uses atomic writes (write to temp file, then rename) to prevent corruption.
//!
//! Storage location: `~/.local/share/sleng/slang.json` (configurable via `Config`)
//!
//! Every reader and writer of the file goes through one `DocumentStore`
//! and its reader/writer lock: loads run in parallel, a save excludes
//! everything else. The lock covers a single load or a single save only,
//! so two callers doing load-mutate-save at the same time can lose one
//! of the updates.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use tracing::{debug, error, warn};

use super::error::{StorageError, StorageResult};
use crate::config::Config;
use crate::models::Document;

/// Shared handle to the dictionary document on disk
pub struct DocumentStore {
    path: PathBuf,
    lock: RwLock<()>,
}

impl DocumentStore {
    /// Create a store backed by the given file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: RwLock::new(()),
        }
    }

    /// Create a store for the document configured in `config`
    pub fn open(config: &Config) -> Self {
        Self::new(config.data_file_path())
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the document, falling back to an empty one
    ///
    /// A missing, unreadable, or unparseable file yields the default
    /// document. The condition is logged, never returned.
    pub fn load(&self) -> Document {
        match self.try_load() {
            Ok(Some(doc)) => doc,
            Ok(None) => {
                debug!("No document at {:?}, starting empty", self.path);
                Document::default()
            }
            Err(e) => {
                warn!("{}, starting empty", e);
                Document::default()
            }
        }
    }

    /// Load the document from disk
    ///
    /// Returns `None` if the file doesn't exist.
    pub fn try_load(&self) -> StorageResult<Option<Document>> {
        let _guard = self.lock.read();

        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StorageError::from_read(e, self.path.clone())),
        };

        let doc = serde_json::from_slice(&bytes).map_err(|source| StorageError::InvalidFormat {
            path: self.path.clone(),
            source,
        })?;

        Ok(Some(doc))
    }

    /// Save the document, logging any failure
    ///
    /// Returns whether the write went through.
    pub fn save(&self, doc: &Document) -> bool {
        match self.try_save(doc) {
            Ok(()) => true,
            Err(e) => {
                error!("Failed to save document: {}", e);
                false
            }
        }
    }

    /// Save the document to disk using atomic write
    ///
    /// The document is written as indented JSON.
    pub fn try_save(&self, doc: &Document) -> StorageResult<()> {
        let bytes = serde_json::to_vec_pretty(doc).map_err(StorageError::Serialize)?;

        let _guard = self.lock.write();
        atomic_write(&self.path, &bytes)
    }
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
///
/// The target file is never left in a partially-written state.
fn atomic_write(path: &Path, data: &[u8]) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| StorageError::from_io(e, parent.to_path_buf()))?;
        }
    }

    // Same directory as the target so the rename stays on one filesystem
    let temp_path = path.with_extension("tmp");

    let mut file =
        File::create(&temp_path).map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    file.write_all(data)
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    file.sync_all()
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    fs::rename(&temp_path, path).map_err(|source| StorageError::AtomicWriteFailed {
        from: temp_path.clone(),
        to: path.to_path_buf(),
        source,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Entry, User};
    use std::sync::Arc;
    use std::thread;
    use tempfile::TempDir;

    fn test_store(temp_dir: &TempDir) -> DocumentStore {
        DocumentStore::new(temp_dir.path().join("slang.json"))
    }

    fn sample_document() -> Document {
        Document {
            user: User {
                username: "ann".to_string(),
                password: "secr3t".to_string(),
            },
            version: "1.0".to_string(),
            entries: vec![
                Entry::new("rizz", "charisma").with_example("he has rizz"),
                Entry::new("cap", "a lie")
                    .with_origin("AAVE")
                    .with_synonyms(vec!["lie".to_string(), "fib".to_string()]),
                Entry::new("bussin", "really good"),
            ],
        }
    }

    #[test]
    fn test_missing_file_loads_default() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);

        assert!(!store.path().exists());
        assert!(store.try_load().unwrap().is_none());
        assert_eq!(store.load(), Document::default());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);

        let doc = sample_document();
        assert!(store.save(&doc));
        assert!(store.path().exists());

        let loaded = store.load();
        assert_eq!(loaded, doc);
        assert!(loaded.entries[0].origin.is_empty());
        assert!(loaded.entries[0].synonyms.is_empty());
        assert_eq!(loaded.entries[1].synonyms, vec!["lie", "fib"]);
    }

    #[test]
    fn test_saved_file_is_indented_json() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);

        store.try_save(&sample_document()).unwrap();

        let content = fs::read_to_string(store.path()).unwrap();
        assert!(content.contains("\n  \"user\": {"));
        assert!(content.contains("\"version\": \"1.0\""));
        // Empty optional fields are left out
        assert_eq!(content.matches("\"origin\"").count(), 1);
    }

    #[test]
    fn test_corrupt_file_loads_default() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);
        fs::write(store.path(), "{ not json").unwrap();

        assert!(matches!(
            store.try_load(),
            Err(StorageError::InvalidFormat { .. })
        ));
        assert_eq!(store.load(), Document::default());
    }

    #[test]
    fn test_null_fields_keep_user_and_entries() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);
        fs::write(
            store.path(),
            r#"{"user": {"username": "ann", "password": "secr3t"}, "version": "1.0",
                "entries": [{"word": "rizz", "meaning": "charisma", "example": "",
                             "synonyms": null}]}"#,
        )
        .unwrap();

        let doc = store.try_load().unwrap().unwrap();
        assert_eq!(doc.user.username, "ann");
        assert_eq!(doc.entries, vec![Entry::new("rizz", "charisma")]);

        fs::write(
            store.path(),
            r#"{"user": {"username": "ann", "password": "secr3t"}, "entries": null}"#,
        )
        .unwrap();

        let doc = store.load();
        assert_eq!(doc.user.username, "ann");
        assert!(doc.entries.is_empty());
    }

    #[test]
    fn test_wrong_shape_loads_default() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);
        fs::write(store.path(), r#"{"entries": "nope"}"#).unwrap();

        assert_eq!(store.load(), Document::default());
    }

    #[test]
    fn test_unreadable_path_loads_default() {
        let temp_dir = TempDir::new().unwrap();
        // A directory where the file should be
        let store = DocumentStore::new(temp_dir.path());

        assert!(store.try_load().is_err());
        assert_eq!(store.load(), Document::default());
    }

    #[test]
    fn test_save_failure_is_reported_not_raised() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "file, not a directory").unwrap();
        let store = DocumentStore::new(blocker.join("slang.json"));

        assert!(store.try_save(&sample_document()).is_err());
        assert!(!store.save(&sample_document()));
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let store = DocumentStore::new(temp_dir.path().join("a").join("b").join("slang.json"));

        assert!(store.save(&sample_document()));
        assert_eq!(store.load(), sample_document());
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);

        store.try_save(&sample_document()).unwrap();
        assert!(!temp_dir.path().join("slang.tmp").exists());
    }

    #[test]
    fn test_concurrent_loads_never_see_partial_writes() {
        let temp_dir = TempDir::new().unwrap();
        let store = Arc::new(test_store(&temp_dir));
        store.try_save(&sample_document()).unwrap();

        let writer = {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..50 {
                    let mut doc = sample_document();
                    doc.entries.push(Entry::new(format!("word{}", i), "meaning"));
                    store.try_save(&doc).unwrap();
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for _ in 0..50 {
                        let doc = store.try_load().unwrap().unwrap();
                        assert_eq!(doc.user.username, "ann");
                        assert!(doc.entries.len() >= 3);
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
    }
}
