//! Error handling for the ledger
//!
//! Every fallible operation returns [`Result`]. Two kinds are recoverable
//! (`NotFound`, `InsufficientFunds`): the caller can fix the request and try
//! again. Everything else aborts the operation in progress.

use std::fmt;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, BlockchainError>;

/// Error kinds produced by the ledger engine and its collaborators
#[derive(Debug, Clone)]
pub enum BlockchainError {
    /// A transaction, block or chain is absent from the store
    NotFound(String),
    /// Funding search accumulated less than the requested amount
    InsufficientFunds { required: u64, available: u64 },
    /// A transaction signature did not verify
    InvalidSignature(String),
    /// Proof-of-work, chain linkage or spending rules were broken
    ConsensusViolation(String),
    /// Malformed transaction requests
    Transaction(String),
    /// Persistence adapter errors
    Database(String),
    /// A chain already exists where a new one was requested
    AlreadyExists(String),
    /// Cryptographic operation errors
    Crypto(String),
    /// Serialization/deserialization errors
    Serialization(String),
    /// File I/O errors
    Io(String),
    /// Invalid address format
    InvalidAddress(String),
    /// Wallet operation errors
    Wallet(String),
    /// Block construction errors
    InvalidBlock(String),
    /// The nonce search ran out of range
    Mining(String),
}

impl BlockchainError {
    /// Recoverable kinds are reported to the user as actionable failures.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            BlockchainError::NotFound(_) | BlockchainError::InsufficientFunds { .. }
        )
    }
}

impl fmt::Display for BlockchainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockchainError::NotFound(msg) => write!(f, "Not found: {msg}"),
            BlockchainError::InsufficientFunds {
                required,
                available,
            } => {
                write!(
                    f,
                    "Not enough funds: required {required}, available {available}"
                )
            }
            BlockchainError::InvalidSignature(msg) => write!(f, "Invalid signature: {msg}"),
            BlockchainError::ConsensusViolation(msg) => write!(f, "Consensus violation: {msg}"),
            BlockchainError::Transaction(msg) => write!(f, "Transaction error: {msg}"),
            BlockchainError::Database(msg) => write!(f, "Database error: {msg}"),
            BlockchainError::AlreadyExists(msg) => write!(f, "Already exists: {msg}"),
            BlockchainError::Crypto(msg) => write!(f, "Cryptographic error: {msg}"),
            BlockchainError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
            BlockchainError::Io(msg) => write!(f, "I/O error: {msg}"),
            BlockchainError::InvalidAddress(addr) => write!(f, "Invalid address: {addr}"),
            BlockchainError::Wallet(msg) => write!(f, "Wallet error: {msg}"),
            BlockchainError::InvalidBlock(msg) => write!(f, "Invalid block: {msg}"),
            BlockchainError::Mining(msg) => write!(f, "Mining error: {msg}"),
        }
    }
}

impl std::error::Error for BlockchainError {}

impl From<std::io::Error> for BlockchainError {
    fn from(err: std::io::Error) -> Self {
        BlockchainError::Io(err.to_string())
    }
}

impl From<sled::Error> for BlockchainError {
    fn from(err: sled::Error) -> Self {
        BlockchainError::Database(err.to_string())
    }
}

impl From<bincode::error::EncodeError> for BlockchainError {
    fn from(err: bincode::error::EncodeError) -> Self {
        BlockchainError::Serialization(err.to_string())
    }
}

impl From<bincode::error::DecodeError> for BlockchainError {
    fn from(err: bincode::error::DecodeError) -> Self {
        BlockchainError::Serialization(err.to_string())
    }
}
