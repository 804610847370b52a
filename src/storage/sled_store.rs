use crate::error::{BlockchainError, Result};
use crate::storage::Storage;
use sled::Tree;
use std::path::Path;

const BLOCKS_TREE: &str = "blocks";

/// Sled-backed store. All records live in a single `blocks` tree.
#[derive(Clone)]
pub struct SledStore {
    blocks: Tree,
}

impl SledStore {
    pub fn open(path: impl AsRef<Path>) -> Result<SledStore> {
        let db = sled::open(path)
            .map_err(|e| BlockchainError::Database(format!("Failed to open database: {e}")))?;
        let blocks = db
            .open_tree(BLOCKS_TREE)
            .map_err(|e| BlockchainError::Database(format!("Failed to open blocks tree: {e}")))?;
        Ok(SledStore { blocks })
    }

    /// Whether a database directory is already present at `path`.
    pub fn exists(path: impl AsRef<Path>) -> bool {
        path.as_ref().exists()
    }
}

impl Storage for SledStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let value = self
            .blocks
            .get(key)
            .map_err(|e| BlockchainError::Database(format!("Failed to read key: {e}")))?;
        Ok(value.map(|v| v.to_vec()))
    }

    fn put_batch(&self, entries: &[(Vec<u8>, Vec<u8>)]) -> Result<()> {
        self.blocks
            .transaction(|tx_db| {
                for (key, value) in entries {
                    tx_db.insert(key.as_slice(), value.as_slice())?;
                }
                Ok(())
            })
            .map_err(|e: sled::transaction::TransactionError| {
                BlockchainError::Database(format!("Failed to write batch: {e}"))
            })?;

        self.blocks
            .flush()
            .map_err(|e| BlockchainError::Database(format!("Failed to flush blocks tree: {e}")))?;
        Ok(())
    }
}
