//! File-backed credential store.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use log::debug;

use super::CredentialStore;

/// Credential store persisted as a JSON object on disk.
///
/// Every operation reads the file fresh, so concurrent processes observe
/// each other's writes. The file holds a handful of short strings; no
/// caching is needed.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default location under the user config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("kadmin").join("credentials.json"))
    }

    fn load(&self) -> Result<HashMap<String, String>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let contents =
            fs::read_to_string(&self.path).context("Failed to read credentials file")?;
        serde_json::from_str(&contents).context("Failed to parse credentials file")
    }

    fn save(&self, entries: &HashMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("Failed to create credentials directory")?;
        }
        let contents = serde_json::to_string_pretty(entries)
            .context("Failed to serialize credentials")?;
        fs::write(&self.path, contents).context("Failed to write credentials file")?;
        Ok(())
    }
}

impl CredentialStore for FileStore {
    #[tracing::instrument(skip(self))]
    fn get(&self, key: &str) -> Option<String> {
        match self.load() {
            Ok(entries) => entries.get(key).cloned(),
            Err(e) => {
                debug!("Credential lookup for {} failed: {:#}", key, e);
                None
            }
        }
    }

    #[tracing::instrument(skip(self, value))]
    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries)
    }

    #[tracing::instrument(skip(self))]
    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.load()?;
        if entries.remove(key).is_none() {
            // Absent key, nothing to persist.
            return Ok(());
        }
        self.save(&entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("credentials.json"));

        assert_eq!(store.get("token"), None);

        store.set("token", "value").unwrap();
        assert_eq!(store.get("token"), Some("value".to_string()));

        store.remove("token").unwrap();
        assert_eq!(store.get("token"), None);
    }

    #[test]
    fn test_file_store_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("a/b/credentials.json"));

        store.set("token", "value").unwrap();
        assert_eq!(store.get("token"), Some("value".to_string()));
    }

    #[test]
    fn test_file_store_remove_absent_key_is_noop() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        let store = FileStore::new(&path);

        store.remove("never_set").unwrap();
        // No file should have been created for a no-op removal.
        assert!(!path.exists());
    }

    #[test]
    fn test_file_store_keeps_other_keys_on_remove() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("credentials.json"));

        store.set("kindergarten_token", "A").unwrap();
        store.set("auth_token", "C").unwrap();
        store.remove("kindergarten_token").unwrap();

        assert_eq!(store.get("kindergarten_token"), None);
        assert_eq!(store.get("auth_token"), Some("C".to_string()));
    }

    #[test]
    fn test_file_store_corrupt_file_reads_as_absent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        fs::write(&path, "not json").unwrap();

        let store = FileStore::new(&path);
        assert_eq!(store.get("token"), None);
        assert!(store.set("token", "value").is_err());
    }
}
