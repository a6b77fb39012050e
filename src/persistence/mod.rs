//! Key/value persistence
//!
//! The game stores two small records: the best time and the control-panel
//! settings. On the web they live in LocalStorage; natively and in tests
//! an in-memory map stands in.

use std::collections::HashMap;

use thiserror::Error;

/// Failure writing to a store
#[derive(Debug, Error)]
pub enum StorageError {
    /// No storage backend is reachable (private mode, no window, ...)
    #[error("storage unavailable")]
    Unavailable,
    /// The backend refused the write (quota exceeded, security error)
    #[error("storage rejected write to {key:?}: {reason}")]
    Rejected { key: String, reason: String },
    #[error("failed to encode value: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Process-wide durable string store
pub trait KeyValueStore {
    /// Read a value; missing keys and read failures both yield `None`
    fn get_item(&self, key: &str) -> Option<String>;

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Store backed by a `HashMap`; nothing survives the process
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::LocalStorage;

#[cfg(target_arch = "wasm32")]
mod web {
    use super::{KeyValueStore, StorageError};

    /// Browser `window.localStorage`
    pub struct LocalStorage {
        storage: Option<web_sys::Storage>,
    }

    impl LocalStorage {
        pub fn new() -> Self {
            let storage = web_sys::window()
                .and_then(|w| w.local_storage().ok())
                .flatten();
            if storage.is_none() {
                log::warn!("LocalStorage unavailable - progress will not be saved");
            }
            Self { storage }
        }
    }

    impl Default for LocalStorage {
        fn default() -> Self {
            Self::new()
        }
    }

    impl KeyValueStore for LocalStorage {
        fn get_item(&self, key: &str) -> Option<String> {
            self.storage.as_ref()?.get_item(key).ok().flatten()
        }

        fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            let storage = self.storage.as_ref().ok_or(StorageError::Unavailable)?;
            storage
                .set_item(key, value)
                .map_err(|e| StorageError::Rejected {
                    key: key.to_string(),
                    reason: format!("{:?}", e),
                })
        }
    }
}
