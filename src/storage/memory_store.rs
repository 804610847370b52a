use crate::error::{BlockchainError, Result};
use crate::storage::Storage;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// In-memory store. Clones share the same entries, so a second handle
/// behaves like reopening the same database.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<Vec<u8>, Vec<u8>>>>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Storage for MemoryStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| BlockchainError::Database("Memory store lock poisoned".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn put_batch(&self, batch: &[(Vec<u8>, Vec<u8>)]) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| BlockchainError::Database("Memory store lock poisoned".to_string()))?;
        for (key, value) in batch {
            entries.insert(key.clone(), value.clone());
        }
        Ok(())
    }
}
