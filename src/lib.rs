//! # Ledger Chain - a single-node UTXO ledger
//!
//! An append-only chain of blocks holding signed value transfers, linked by
//! hash and admitted through proof-of-work. Notes for when I come back:
//!
//! ## What Is Here
//! - **Proof-of-Work**: one fixed target (`TARGET_BITS`), ascending nonce search
//! - **UTXO Model**: outputs locked to a public-key hash, inputs signed with
//!   ECDSA P-256 over a trimmed copy of the transaction
//! - **Ledger Queries**: balance, spendable outputs and funding selection are
//!   all derived by walking the chain from the tip back to genesis
//! - **Storage**: a tiny key-value trait; sled on disk, a map in memory
//!
//! ## How the Code Is Organized
//! - `core/`: blocks, transactions, the chain and its queries, proof-of-work
//! - `storage/`: the `Storage` trait and its two implementations
//! - `wallet/`: key pairs, addresses, the wallet file
//! - `config/`: where the database and wallet file live
//! - `utils/`: hashing, signatures, base58, the bincode record codec
//! - `cli/`: argument parsing for the binary
//!
//! ## Where to Start
//! 1. `main.rs` for the commands
//! 2. `core/blockchain.rs` for mining and the traversal queries
//! 3. `core/transaction.rs` for signing and verification

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod storage;
pub mod utils;
pub mod wallet;

pub use cli::{Command, Opt};
pub use config::{Config, GLOBAL_CONFIG};
pub use core::{
    Block, Blockchain, BlockchainIterator, ProofOfWork, TXInput, TXOutput, Transaction, SUBSIDY,
    TARGET_BITS,
};
pub use error::{BlockchainError, Result};
pub use storage::{MemoryStore, SledStore, Storage, TIP_BLOCK_HASH_KEY};
pub use utils::{
    base58_decode, base58_encode, current_timestamp, ecdsa_p256_sha256_sign_digest,
    ecdsa_p256_sha256_sign_verify, new_key_pair, ripemd160_digest, sha256_digest,
};
pub use wallet::{
    address_to_pub_key_hash, convert_address, hash_pub_key, validate_address, Wallet, Wallets,
    ADDRESS_CHECK_SUM_LEN,
};
