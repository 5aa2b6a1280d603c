//! Credential storage and bearer token resolution.
//!
//! Tokens have been persisted under several key names over time, so
//! resolution walks the keys newest-scheme-first and the first non-empty
//! value wins. Absence of all keys means unauthenticated.

mod file;

pub use file::FileStore;

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::Result;

/// Persisted token keys, in resolution priority order. Do not reorder.
pub const TOKEN_KEYS: [&str; 3] = ["kindergarten_token", "token", "auth_token"];

/// Key-value store holding persisted credentials.
///
/// The request interceptor only reads the store and the session invalidator
/// is its only writer. Removing an absent key must succeed.
#[cfg_attr(test, mockall::automock)]
pub trait CredentialStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Resolves the current bearer token: the first non-empty value found under
/// [`TOKEN_KEYS`], or `None` when every key is absent or empty.
pub fn resolve_token(store: &dyn CredentialStore) -> Option<String> {
    TOKEN_KEYS
        .iter()
        .filter_map(|key| store.get(key))
        .find(|token| !token.is_empty())
}

/// In-memory credential store.
///
/// Used as the test double and by callers that do not want credentials to
/// outlive the process.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.remove(key);
        Ok(())
    }
}
