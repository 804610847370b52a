//! Data storage and persistence
//!
//! The ledger only needs get/put of opaque blobs keyed by block hash plus
//! one mutable tip pointer. [`Storage`] is that surface; [`SledStore`] backs
//! it on disk and [`MemoryStore`] keeps everything in process.

pub mod memory_store;
pub mod sled_store;
pub mod store;

pub use memory_store::MemoryStore;
pub use sled_store::SledStore;
pub use store::{Storage, TIP_BLOCK_HASH_KEY};
