//! Session shopping list and the repository seam it is persisted through.
//!
//! The list stores retailer-agnostic [`ProductKey`]s, not prices; prices are
//! looked up fresh by [`crate::pricing`] each time totals are needed, so a
//! list reloaded from storage aggregates exactly like the one that was saved.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::products::ProductKey;
use crate::ListStoreError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingListEntry {
    pub key: ProductKey,
    /// Display name captured when the item was added.
    pub name: String,
    /// Always at least 1 while the entry is on the list.
    pub quantity: u32,
    pub checked: bool,
    pub added_at: DateTime<Utc>,
}

/// Ordered shopping list. Entries keep the order they were first added in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShoppingList {
    entries: Vec<ShoppingListEntry>,
}

impl ShoppingList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a list from stored entries, dropping any with quantity 0.
    ///
    /// Repeated keys are merged into the first occurrence by summing
    /// quantities, so every key appears at most once.
    #[must_use]
    pub fn from_entries(entries: Vec<ShoppingListEntry>) -> Self {
        let mut list = Self::new();
        for entry in entries {
            if entry.quantity == 0 {
                tracing::warn!(key = %entry.key, "dropping stored list entry with zero quantity");
                continue;
            }
            if let Some(existing) = list.get_mut(&entry.key) {
                tracing::warn!(key = %entry.key, "merging duplicate stored list entry");
                existing.quantity = existing.quantity.saturating_add(entry.quantity);
                continue;
            }
            list.entries.push(entry);
        }
        list
    }

    #[must_use]
    pub fn entries(&self) -> &[ShoppingListEntry] {
        &self.entries
    }

    #[must_use]
    pub fn into_entries(self) -> Vec<ShoppingListEntry> {
        self.entries
    }

    #[must_use]
    pub fn get(&self, key: &ProductKey) -> Option<&ShoppingListEntry> {
        self.entries.iter().find(|e| &e.key == key)
    }

    fn get_mut(&mut self, key: &ProductKey) -> Option<&mut ShoppingListEntry> {
        self.entries.iter_mut().find(|e| &e.key == key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of quantities across all entries.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.quantity)).sum()
    }

    #[must_use]
    pub fn checked_count(&self) -> usize {
        self.entries.iter().filter(|e| e.checked).count()
    }

    /// Adds one of `key`, or bumps the quantity if it is already listed.
    pub fn add(&mut self, key: ProductKey, name: impl Into<String>) {
        self.add_quantity(key, name, 1);
    }

    /// Adds `quantity` of `key`. A zero quantity is ignored.
    pub fn add_quantity(&mut self, key: ProductKey, name: impl Into<String>, quantity: u32) {
        if quantity == 0 {
            return;
        }
        if let Some(entry) = self.get_mut(&key) {
            entry.quantity = entry.quantity.saturating_add(quantity);
            return;
        }
        self.entries.push(ShoppingListEntry {
            key,
            name: name.into(),
            quantity,
            checked: false,
            added_at: Utc::now(),
        });
    }

    /// Sets the quantity of an existing entry; `0` removes it.
    ///
    /// Returns `false` when `key` is not on the list.
    pub fn set_quantity(&mut self, key: &ProductKey, quantity: u32) -> bool {
        if quantity == 0 {
            return self.remove(key);
        }
        match self.get_mut(key) {
            Some(entry) => {
                entry.quantity = quantity;
                true
            }
            None => false,
        }
    }

    pub fn increment(&mut self, key: &ProductKey) -> bool {
        match self.get_mut(key) {
            Some(entry) => {
                entry.quantity = entry.quantity.saturating_add(1);
                true
            }
            None => false,
        }
    }

    /// Lowers the quantity by one, removing the entry when it reaches zero.
    pub fn decrement(&mut self, key: &ProductKey) -> bool {
        let Some(entry) = self.get_mut(key) else {
            return false;
        };
        if entry.quantity <= 1 {
            return self.remove(key);
        }
        entry.quantity -= 1;
        true
    }

    pub fn toggle_checked(&mut self, key: &ProductKey) -> bool {
        match self.get_mut(key) {
            Some(entry) => {
                entry.checked = !entry.checked;
                true
            }
            None => false,
        }
    }

    pub fn set_checked(&mut self, key: &ProductKey, checked: bool) -> bool {
        match self.get_mut(key) {
            Some(entry) => {
                entry.checked = checked;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, key: &ProductKey) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| &e.key != key);
        self.entries.len() != before
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Removes every checked entry and returns how many were removed.
    pub fn clear_checked(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| !e.checked);
        before - self.entries.len()
    }

    /// Loads a list through `repo`.
    ///
    /// # Errors
    ///
    /// Propagates the repository's [`ListStoreError`].
    pub fn load_from(repo: &impl ListRepository) -> Result<Self, ListStoreError> {
        Ok(Self::from_entries(repo.load()?))
    }

    /// Persists this list through `repo`.
    ///
    /// # Errors
    ///
    /// Propagates the repository's [`ListStoreError`].
    pub fn save_to(&self, repo: &impl ListRepository) -> Result<(), ListStoreError> {
        repo.save(&self.entries)
    }
}

/// Storage for the shopping list between sessions.
pub trait ListRepository {
    /// Returns the stored entries, or an empty list if nothing was stored yet.
    ///
    /// # Errors
    ///
    /// Returns [`ListStoreError`] when stored data cannot be read or decoded.
    fn load(&self) -> Result<Vec<ShoppingListEntry>, ListStoreError>;

    /// Replaces the stored entries.
    ///
    /// # Errors
    ///
    /// Returns [`ListStoreError`] when the entries cannot be written.
    fn save(&self, entries: &[ShoppingListEntry]) -> Result<(), ListStoreError>;
}

/// Stores the list as a pretty-printed JSON array in a single file.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> ListStoreError {
        ListStoreError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl ListRepository for JsonFileRepository {
    fn load(&self) -> Result<Vec<ShoppingListEntry>, ListStoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no stored shopping list yet");
                return Ok(Vec::new());
            }
            Err(e) => return Err(self.io_error(e)),
        };
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&content).map_err(|source| ListStoreError::Json {
            path: self.path.display().to_string(),
            source,
        })
    }

    fn save(&self, entries: &[ShoppingListEntry]) -> Result<(), ListStoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let json = serde_json::to_string_pretty(entries).map_err(ListStoreError::Serialize)?;

        // Write-then-rename so a crash mid-write never leaves a truncated list.
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|e| self.io_error(e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))?;
        tracing::debug!(path = %self.path.display(), count = entries.len(), "saved shopping list");
        Ok(())
    }
}

/// Keeps the list in memory only.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    entries: Mutex<Vec<ShoppingListEntry>>,
}

impl MemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ListRepository for MemoryRepository {
    fn load(&self) -> Result<Vec<ShoppingListEntry>, ListStoreError> {
        Ok(self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, entries: &[ShoppingListEntry]) -> Result<(), ListStoreError> {
        *self.entries.lock().unwrap_or_else(PoisonError::into_inner) = entries.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(name: &str) -> ProductKey {
        ProductKey::from_name(name)
    }

    fn temp_list_path(test_name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("kurv-list-{}", std::process::id()))
            .join(format!("{test_name}.json"))
    }

    fn stored_entry(name: &str, quantity: u32, checked: bool) -> ShoppingListEntry {
        ShoppingListEntry {
            key: key(name),
            name: name.to_string(),
            quantity,
            checked,
            added_at: Utc::now(),
        }
    }

    #[test]
    fn from_entries_merges_duplicate_keys() {
        let list = ShoppingList::from_entries(vec![
            stored_entry("Milk", 2, true),
            stored_entry("Bread", 1, false),
            stored_entry("milk", 3, false),
        ]);
        assert_eq!(list.len(), 2);
        let milk = list.get(&key("Milk")).unwrap();
        assert_eq!(milk.quantity, 5);
        assert!(milk.checked);
        assert_eq!(list.entries()[0].key, key("Milk"));
        assert_eq!(list.total_items(), 6);
    }

    #[test]
    fn from_entries_drops_zero_quantity_before_merging() {
        let list = ShoppingList::from_entries(vec![
            stored_entry("Milk", 0, false),
            stored_entry("Milk", 1, false),
        ]);
        assert_eq!(list.len(), 1);
        assert_eq!(list.get(&key("Milk")).unwrap().quantity, 1);
    }

    #[test]
    fn add_new_entry_starts_at_one_unchecked() {
        let mut list = ShoppingList::new();
        list.add(key("Milk"), "Milk");
        let entry = list.get(&key("milk")).expect("entry should exist");
        assert_eq!(entry.quantity, 1);
        assert!(!entry.checked);
        assert_eq!(entry.name, "Milk");
    }

    #[test]
    fn add_existing_entry_increments_quantity() {
        let mut list = ShoppingList::new();
        list.add(key("Milk"), "Milk");
        list.add(key("Milk"), "Milk");
        list.add_quantity(key("Milk"), "Milk", 3);
        assert_eq!(list.len(), 1);
        assert_eq!(list.get(&key("Milk")).unwrap().quantity, 5);
    }

    #[test]
    fn add_quantity_zero_is_ignored() {
        let mut list = ShoppingList::new();
        list.add_quantity(key("Milk"), "Milk", 0);
        assert!(list.is_empty());
    }

    #[test]
    fn entries_keep_insertion_order() {
        let mut list = ShoppingList::new();
        list.add(key("Milk"), "Milk");
        list.add(key("Bread"), "Bread");
        list.add(key("Milk"), "Milk");
        let names: Vec<_> = list.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Milk", "Bread"]);
    }

    #[test]
    fn set_quantity_zero_removes_entry() {
        let mut list = ShoppingList::new();
        list.add(key("Milk"), "Milk");
        assert!(list.set_quantity(&key("Milk"), 0));
        assert!(list.is_empty());
    }

    #[test]
    fn set_quantity_on_missing_key_is_noop() {
        let mut list = ShoppingList::new();
        assert!(!list.set_quantity(&key("Milk"), 4));
        assert!(list.is_empty());
    }

    #[test]
    fn decrement_to_zero_removes_entry() {
        let mut list = ShoppingList::new();
        list.add_quantity(key("Milk"), "Milk", 2);
        assert!(list.decrement(&key("Milk")));
        assert_eq!(list.get(&key("Milk")).unwrap().quantity, 1);
        assert!(list.decrement(&key("Milk")));
        assert!(list.get(&key("Milk")).is_none());
        assert!(!list.decrement(&key("Milk")));
    }

    #[test]
    fn increment_and_totals() {
        let mut list = ShoppingList::new();
        list.add(key("Milk"), "Milk");
        list.add_quantity(key("Bread"), "Bread", 2);
        assert!(list.increment(&key("Milk")));
        assert_eq!(list.total_items(), 4);
    }

    #[test]
    fn toggle_and_clear_checked() {
        let mut list = ShoppingList::new();
        list.add(key("Milk"), "Milk");
        list.add(key("Bread"), "Bread");
        assert!(list.toggle_checked(&key("Milk")));
        assert_eq!(list.checked_count(), 1);
        assert!(list.set_checked(&key("Bread"), true));
        assert!(list.toggle_checked(&key("Bread")));
        assert_eq!(list.clear_checked(), 1);
        assert_eq!(list.len(), 1);
        assert!(list.get(&key("Bread")).is_some());
    }

    #[test]
    fn remove_and_clear() {
        let mut list = ShoppingList::new();
        list.add(key("Milk"), "Milk");
        list.add(key("Bread"), "Bread");
        assert!(list.remove(&key("Milk")));
        assert!(!list.remove(&key("Milk")));
        list.clear();
        assert!(list.is_empty());
    }

    #[test]
    fn from_entries_drops_zero_quantity() {
        let entries = vec![
            ShoppingListEntry {
                key: key("Milk"),
                name: "Milk".to_string(),
                quantity: 0,
                checked: false,
                added_at: Utc::now(),
            },
            ShoppingListEntry {
                key: key("Bread"),
                name: "Bread".to_string(),
                quantity: 2,
                checked: true,
                added_at: Utc::now(),
            },
        ];
        let list = ShoppingList::from_entries(entries);
        assert_eq!(list.len(), 1);
        assert_eq!(list.entries()[0].name, "Bread");
    }

    #[test]
    fn memory_repository_roundtrip() {
        let repo = MemoryRepository::new();
        assert!(repo.load().unwrap().is_empty());

        let mut list = ShoppingList::new();
        list.add_quantity(key("Milk"), "Milk", 2);
        list.add(key("Bread"), "Bread");
        list.toggle_checked(&key("Bread"));
        list.save_to(&repo).unwrap();

        let reloaded = ShoppingList::load_from(&repo).unwrap();
        assert_eq!(reloaded, list);
    }

    #[test]
    fn json_file_repository_missing_file_loads_empty() {
        let repo = JsonFileRepository::new(temp_list_path("missing-never-written"));
        assert!(repo.load().unwrap().is_empty());
    }

    #[test]
    fn json_file_repository_roundtrip() {
        let path = temp_list_path("roundtrip");
        let _ = std::fs::remove_file(&path);
        let repo = JsonFileRepository::new(&path);

        let mut list = ShoppingList::new();
        list.add_quantity(key("Milk"), "Milk", 3);
        list.add(ProductKey::from_barcode("7038010009457"), "Lettmelk");
        list.set_checked(&key("Milk"), true);
        list.save_to(&repo).unwrap();

        let reloaded = ShoppingList::load_from(&repo).unwrap();
        assert_eq!(reloaded, list);
        assert!(!path.with_extension("json.tmp").exists());

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn json_file_repository_rejects_garbage() {
        let path = temp_list_path("garbage");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{not json").unwrap();
        let repo = JsonFileRepository::new(&path);
        let err = repo.load().unwrap_err();
        assert!(matches!(err, ListStoreError::Json { .. }));
        let _ = std::fs::remove_file(&path);
    }
}
