use crate::error::Result;

/// Reserved key holding the hash of the current tip block.
pub const TIP_BLOCK_HASH_KEY: &[u8] = b"l";

/// The narrow key-value surface the ledger needs from a persistent store.
///
/// Keys are block hashes (plus [`TIP_BLOCK_HASH_KEY`]) and values are opaque
/// serialized records. A batch is applied all-or-nothing.
pub trait Storage {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;

    fn put_batch(&self, entries: &[(Vec<u8>, Vec<u8>)]) -> Result<()>;

    fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        self.put_batch(&[(key.to_vec(), value.to_vec())])
    }
}
