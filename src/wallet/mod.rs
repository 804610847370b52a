//! Address book
//!
//! Key pairs, address encoding and the mapping from an address string to the
//! public-key hash the ledger locks outputs with.

#[allow(clippy::module_inception)]
pub mod wallet;
pub mod wallets;

pub use wallet::{
    address_to_pub_key_hash, convert_address, hash_pub_key, validate_address, Wallet,
    ADDRESS_CHECK_SUM_LEN,
};
pub use wallets::Wallets;
