//! Core ledger functionality
//!
//! Blocks, transactions, the chain with its backward-traversal queries, and
//! the proof-of-work admission rule.

pub mod block;
pub mod blockchain;
pub mod proof_of_work;
pub mod transaction;

pub use block::Block;
pub use blockchain::{Blockchain, BlockchainIterator, GENESIS_COINBASE_DATA};
pub use proof_of_work::{ProofOfWork, TARGET_BITS};
pub use transaction::{TXInput, TXOutput, Transaction, SUBSIDY};
