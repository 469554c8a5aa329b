//! Word-list storage.
//!
//! Lists are named collections of "word,word" pair entries. They live in
//! memory and are mirrored to a JSON file on every mutation; room state is
//! deliberately not persisted, word lists are.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::RwLock;

/// List seeded on first startup and used when a requested list is unknown
pub const DEFAULT_LIST: &str = "default";

/// Reserved list whose pairs keep their written order when dealt: the first
/// word always goes to civilians, the coin flip is skipped
pub const FIXED_ORDER_LIST: &str = "fixed";

const SEED_PAIRS: &[&str] = &["apple,pear", "cat,mouse", "banana,grape"];

/// Read-side contract the game core depends on.
#[async_trait]
pub trait WordSource: Send + Sync {
    /// Entries of the named list, or None if the list does not exist
    async fn get(&self, list_name: &str) -> Option<Vec<String>>;

    async fn contains(&self, list_name: &str) -> bool;
}

/// JSON-file-backed implementation of [`WordSource`].
pub struct WordListStore {
    lists: RwLock<HashMap<String, Vec<String>>>,
    path: PathBuf,
}

impl WordListStore {
    /// Load lists from `path`. A missing file starts empty, a corrupt one is
    /// reset; either way the default list is seeded if absent.
    pub async fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let lists = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => match serde_json::from_str::<HashMap<String, Vec<String>>>(&raw) {
                Ok(lists) => lists,
                Err(e) => {
                    tracing::error!("Failed to parse {}, resetting: {}", path.display(), e);
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };

        let store = Self {
            lists: RwLock::new(lists),
            path,
        };
        store.seed_default().await;
        store
    }

    async fn seed_default(&self) {
        let seeded = {
            let mut lists = self.lists.write().await;
            if lists.contains_key(DEFAULT_LIST) {
                false
            } else {
                lists.insert(
                    DEFAULT_LIST.to_string(),
                    SEED_PAIRS.iter().map(|s| s.to_string()).collect(),
                );
                true
            }
        };
        if seeded {
            tracing::info!("Seeded default word list");
            self.save().await;
        }
    }

    /// Write the lists back to disk. Best effort: a failed write is logged
    /// and the in-memory state stays authoritative.
    async fn save(&self) {
        let json = {
            let lists = self.lists.read().await;
            serde_json::to_string_pretty(&*lists)
        };
        match json {
            Ok(json) => {
                if let Err(e) = tokio::fs::write(&self.path, json).await {
                    tracing::error!(
                        "Failed to save word lists to {}: {}",
                        self.path.display(),
                        e
                    );
                }
            }
            Err(e) => tracing::error!("Failed to serialize word lists: {}", e),
        }
    }

    pub async fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.lists.read().await.keys().cloned().collect();
        names.sort();
        names
    }

    /// Create an empty list. Returns false if the name is already taken.
    pub async fn create(&self, name: &str) -> bool {
        {
            let mut lists = self.lists.write().await;
            if lists.contains_key(name) {
                return false;
            }
            lists.insert(name.to_string(), Vec::new());
        }
        self.save().await;
        true
    }

    pub async fn delete(&self, name: &str) {
        self.lists.write().await.remove(name);
        self.save().await;
    }

    /// Entries of a list; empty for an unknown name
    pub async fn items(&self, name: &str) -> Vec<String> {
        self.lists
            .read()
            .await
            .get(name)
            .cloned()
            .unwrap_or_default()
    }

    /// Append an entry, creating the list if it does not exist yet
    pub async fn add_item(&self, name: &str, item: &str) {
        self.lists
            .write()
            .await
            .entry(name.to_string())
            .or_default()
            .push(item.to_string());
        self.save().await;
    }

    /// Remove every entry equal to `item` from the named list
    pub async fn remove_item(&self, name: &str, item: Option<&str>) {
        {
            let mut lists = self.lists.write().await;
            let entries = lists.entry(name.to_string()).or_default();
            if let Some(item) = item {
                entries.retain(|i| i != item);
            }
        }
        self.save().await;
    }

    /// Replace a list's entries wholesale
    pub async fn replace(&self, name: &str, entries: Vec<String>) {
        self.lists.write().await.insert(name.to_string(), entries);
        self.save().await;
    }
}

#[async_trait]
impl WordSource for WordListStore {
    async fn get(&self, list_name: &str) -> Option<Vec<String>> {
        self.lists.read().await.get(list_name).cloned()
    }

    async fn contains(&self, list_name: &str) -> bool {
        self.lists.read().await.contains_key(list_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_seeds_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = WordListStore::load(dir.path().join("wordlists.json")).await;

        let entries = store.get(DEFAULT_LIST).await.unwrap();
        assert_eq!(entries.len(), 3);
        assert!(entries.contains(&"apple,pear".to_string()));
        // Seeding writes the file immediately
        assert!(dir.path().join("wordlists.json").exists());
    }

    #[tokio::test]
    async fn test_mutations_survive_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wordlists.json");

        let store = WordListStore::load(&path).await;
        assert!(store.create("animals").await);
        store.add_item("animals", "dog,wolf").await;
        store.add_item("animals", "duck,goose").await;
        store.remove_item("animals", Some("dog,wolf")).await;

        let reloaded = WordListStore::load(&path).await;
        assert_eq!(reloaded.items("animals").await, vec!["duck,goose"]);
    }

    #[tokio::test]
    async fn test_corrupt_file_resets() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wordlists.json");
        tokio::fs::write(&path, "not json {").await.unwrap();

        let store = WordListStore::load(&path).await;
        assert_eq!(store.names().await, vec![DEFAULT_LIST.to_string()]);
    }

    #[tokio::test]
    async fn test_create_duplicate_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = WordListStore::load(dir.path().join("wordlists.json")).await;

        assert!(store.create("quiz").await);
        assert!(!store.create("quiz").await);
        assert!(!store.create(DEFAULT_LIST).await);
    }

    #[tokio::test]
    async fn test_unknown_list_reads() {
        let dir = tempfile::tempdir().unwrap();
        let store = WordListStore::load(dir.path().join("wordlists.json")).await;

        assert!(store.get("nope").await.is_none());
        assert!(!store.contains("nope").await);
        assert!(store.items("nope").await.is_empty());
    }
}
