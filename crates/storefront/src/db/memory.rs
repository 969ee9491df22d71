//! In-memory key-value store.

use std::collections::HashMap;
use std::sync::Mutex;

use super::{KeyValueStore, StorageError, lock};

/// Process-local store, optionally bounded by a byte quota.
///
/// The quota counts key and value bytes across all records, which is how
/// browser local storage budgets its space (modulo UTF-16).
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl MemoryStore {
    /// Create an unbounded store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that rejects writes pushing usage past `quota_bytes`.
    #[must_use]
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            records: Mutex::default(),
            quota_bytes: Some(quota_bytes),
        }
    }

    /// Bytes currently held (keys plus values).
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Poisoned` if the store lock is poisoned.
    pub fn usage(&self) -> Result<usize, StorageError> {
        let records = lock(&self.records, "memory store")?;
        Ok(usage_of(&records))
    }
}

fn usage_of(records: &HashMap<String, String>) -> usize {
    records.iter().map(|(k, v)| k.len() + v.len()).sum()
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let records = lock(&self.records, "memory store")?;
        Ok(records.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut records = lock(&self.records, "memory store")?;

        if let Some(quota) = self.quota_bytes {
            let replaced = records.get(key).map_or(0, |old| key.len() + old.len());
            let needed = usage_of(&records) - replaced + key.len() + value.len();
            if needed > quota {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_owned(),
                    needed,
                    quota,
                });
            }
        }

        records.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut records = lock(&self.records, "memory store")?;
        records.remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get("cart").unwrap(), None);

        store.set("cart", "[]").unwrap();
        assert_eq!(store.get("cart").unwrap().as_deref(), Some("[]"));

        store.remove("cart").unwrap();
        store.remove("cart").unwrap();
        assert_eq!(store.get("cart").unwrap(), None);
    }

    #[test]
    fn test_quota_rejects_oversized_write() {
        let store = MemoryStore::with_quota(10);
        store.set("ab", "12345").unwrap();
        assert_eq!(store.usage().unwrap(), 7);

        let err = store.set("cd", "123456").unwrap_err();
        assert!(matches!(
            err,
            StorageError::QuotaExceeded {
                needed: 15,
                quota: 10,
                ..
            }
        ));
        // Rejected write leaves the store untouched.
        assert_eq!(store.get("cd").unwrap(), None);
    }

    #[test]
    fn test_quota_counts_replacement_not_addition() {
        let store = MemoryStore::with_quota(10);
        store.set("ab", "12345678").unwrap();
        store.set("ab", "87654321").unwrap();
        assert_eq!(store.get("ab").unwrap().as_deref(), Some("87654321"));
    }
}
