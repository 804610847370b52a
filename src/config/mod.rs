//! Configuration management
//!
//! Where the block database and the wallet file live. Values come from
//! `LEDGER_DATA_DIR` and `LEDGER_WALLET_FILE`, with local defaults.

pub mod settings;

pub use settings::{Config, DEFAULT_DATA_DIR, DEFAULT_WALLET_FILE, GLOBAL_CONFIG};
