//! Key/value persistence for session state.
//!
//! The session keeps two values between runs: the conversation mode and the
//! transcript. Both live behind the [`Store`] trait so the controller can be
//! exercised against an in-memory map while the terminal client writes one
//! file per key under the user's data directory.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::core::message::Message;
use crate::core::mode::Mode;

pub const MODE_KEY: &str = "chat_mode";
pub const HISTORY_KEY: &str = "chat_history";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read {key} from {path}: {source}")]
    Read {
        key: String,
        path: PathBuf,
        source: io::Error,
    },

    #[error("failed to write {key} to {path}: {source}")]
    Write {
        key: String,
        path: PathBuf,
        source: io::Error,
    },

    #[error("failed to remove {key} at {path}: {source}")]
    Remove {
        key: String,
        path: PathBuf,
        source: io::Error,
    },

    #[error("failed to encode history: {0}")]
    Encode(#[from] serde_json::Error),
}

/// String-keyed persistence with local-storage semantics.
pub trait Store: Send {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// Stores each key in its own file inside `dir`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl Store for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Read {
                key: key.to_string(),
                path,
                source,
            }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        let write_err = |source: io::Error| StoreError::Write {
            key: key.to_string(),
            path: path.clone(),
            source,
        };

        fs::create_dir_all(&self.dir).map_err(write_err)?;
        let mut temp_file = NamedTempFile::new_in(&self.dir).map_err(write_err)?;
        temp_file.write_all(value.as_bytes()).map_err(write_err)?;
        temp_file.as_file_mut().sync_all().map_err(write_err)?;
        temp_file
            .persist(&path)
            .map_err(|err| write_err(err.error))?;
        debug!(key, path = %path.display(), "stored value");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Remove {
                key: key.to_string(),
                path,
                source,
            }),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, key: &str, value: impl Into<String>) -> Self {
        self.values.insert(key.to_string(), value.into());
        self
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.values.remove(key);
        Ok(())
    }
}

pub fn load_mode<S: Store + ?Sized>(store: &S) -> Mode {
    match store.get(MODE_KEY) {
        Ok(value) => Mode::parse_or_default(value.as_deref()),
        Err(err) => {
            warn!("failed to load mode, using default: {err}");
            Mode::default()
        }
    }
}

pub fn save_mode<S: Store + ?Sized>(store: &mut S, mode: Mode) -> Result<(), StoreError> {
    store.set(MODE_KEY, mode.as_str())
}

/// Malformed or unreadable history is logged and treated as empty.
pub fn load_history<S: Store + ?Sized>(store: &S) -> Vec<Message> {
    let raw = match store.get(HISTORY_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(err) => {
            warn!("failed to read chat history: {err}");
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<Message>>(&raw) {
        Ok(messages) => messages,
        Err(err) => {
            warn!("error loading chat history, starting empty: {err}");
            Vec::new()
        }
    }
}

pub fn save_history<S: Store + ?Sized>(
    store: &mut S,
    messages: &[Message],
) -> Result<(), StoreError> {
    let encoded = serde_json::to_string(messages)?;
    store.set(HISTORY_KEY, &encoded)
}

pub fn remove_history<S: Store + ?Sized>(store: &mut S) -> Result<(), StoreError> {
    store.remove(HISTORY_KEY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::Classification;
    use tempfile::TempDir;

    fn sample_history() -> Vec<Message> {
        vec![
            Message::user("Hello"),
            Message::bot("Hi there", Classification::Safe),
            Message::user("you are dumb"),
            Message::bot("Let's keep it friendly", Classification::Offensive),
            Message::user("!!!!"),
            Message::bot("Could you rephrase?", Classification::Irrelevant),
        ]
    }

    #[test]
    fn history_round_trips_in_order() {
        let mut store = MemoryStore::new();
        let history = sample_history();
        save_history(&mut store, &history).expect("save");
        assert_eq!(load_history(&store), history);
    }

    #[test]
    fn history_without_classification_loads_as_safe() {
        let store = MemoryStore::new().with_value(
            HISTORY_KEY,
            r#"[{"text":"hi","sender":"user"},{"text":"hello","sender":"bot"}]"#,
        );
        let loaded = load_history(&store);
        assert_eq!(loaded.len(), 2);
        assert!(loaded
            .iter()
            .all(|m| m.classification == Classification::Safe));
    }

    #[test]
    fn malformed_history_loads_empty() {
        let store = MemoryStore::new().with_value(HISTORY_KEY, "{not json");
        assert!(load_history(&store).is_empty());

        let wrong_shape = MemoryStore::new().with_value(HISTORY_KEY, r#"{"text":"hi"}"#);
        assert!(load_history(&wrong_shape).is_empty());
    }

    #[test]
    fn unknown_sender_is_kept_as_bot() {
        let store = MemoryStore::new().with_value(
            HISTORY_KEY,
            r#"[{"text":"hi","sender":"user"},{"text":"hello","sender":"assistant","classification":"offensive"}]"#,
        );
        let loaded = load_history(&store);
        assert_eq!(
            loaded,
            vec![
                Message::user("hi"),
                Message::bot("hello", Classification::Offensive),
            ]
        );

        let mut resaved = MemoryStore::new();
        save_history(&mut resaved, &loaded).expect("save");
        assert!(resaved
            .get(HISTORY_KEY)
            .expect("get")
            .is_some_and(|raw| raw.contains(r#""sender":"bot""#) && !raw.contains("assistant")));
    }

    #[test]
    fn unknown_mode_loads_as_formal() {
        let store = MemoryStore::new().with_value(MODE_KEY, "chaotic");
        assert_eq!(load_mode(&store), Mode::Formal);
        assert_eq!(load_mode(&MemoryStore::new()), Mode::Formal);
    }

    #[test]
    fn file_store_persists_across_instances() {
        let dir = TempDir::new().expect("tempdir");
        let data_dir = dir.path().join("nested").join("data");

        let mut store = FileStore::new(&data_dir);
        save_mode(&mut store, Mode::Funny).expect("save mode");
        save_history(&mut store, &sample_history()).expect("save history");

        let reopened = FileStore::new(&data_dir);
        assert_eq!(load_mode(&reopened), Mode::Funny);
        assert_eq!(load_history(&reopened), sample_history());
        assert_eq!(
            fs::read_to_string(data_dir.join(MODE_KEY)).expect("mode file"),
            "funny"
        );
    }

    #[test]
    fn file_store_remove_is_idempotent() {
        let dir = TempDir::new().expect("tempdir");
        let mut store = FileStore::new(dir.path());
        save_history(&mut store, &sample_history()).expect("save");

        remove_history(&mut store).expect("first remove");
        remove_history(&mut store).expect("second remove");
        assert_eq!(store.get(HISTORY_KEY).expect("get"), None);
    }
}
