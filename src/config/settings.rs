use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

pub static GLOBAL_CONFIG: Lazy<Config> = Lazy::new(Config::new);

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_WALLET_FILE: &str = "wallet.dat";

const DATA_DIR_KEY: &str = "LEDGER_DATA_DIR";
const WALLET_FILE_KEY: &str = "LEDGER_WALLET_FILE";

/// Process-wide settings, seeded from the environment.
pub struct Config {
    inner: RwLock<HashMap<String, String>>,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Config {
        let mut map = HashMap::new();
        map.insert(
            String::from(DATA_DIR_KEY),
            env::var(DATA_DIR_KEY).unwrap_or_else(|_| String::from(DEFAULT_DATA_DIR)),
        );
        map.insert(
            String::from(WALLET_FILE_KEY),
            env::var(WALLET_FILE_KEY).unwrap_or_else(|_| String::from(DEFAULT_WALLET_FILE)),
        );

        Config {
            inner: RwLock::new(map),
        }
    }

    // a poisoned lock still holds a usable map of strings
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, String>> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, String>> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Directory holding the block database.
    pub fn get_data_dir(&self) -> PathBuf {
        let dir = self
            .read()
            .get(DATA_DIR_KEY)
            .cloned()
            .unwrap_or_else(|| String::from(DEFAULT_DATA_DIR));
        PathBuf::from(dir)
    }

    pub fn set_data_dir(&self, dir: String) {
        self.write().insert(String::from(DATA_DIR_KEY), dir);
    }

    pub fn get_wallet_file(&self) -> PathBuf {
        let file = self
            .read()
            .get(WALLET_FILE_KEY)
            .cloned()
            .unwrap_or_else(|| String::from(DEFAULT_WALLET_FILE));
        PathBuf::from(file)
    }

    pub fn set_wallet_file(&self, file: String) {
        self.write().insert(String::from(WALLET_FILE_KEY), file);
    }
}
