//! User property store configuration.

use serde::{Deserialize, Serialize};

/// Property store backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreProvider {
    /// JSON document on local disk.
    File,
    /// Process-local map; contents are lost on exit.
    Memory,
}

impl Default for StoreProvider {
    fn default() -> Self {
        Self::File
    }
}

impl std::fmt::Display for StoreProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreProvider::File => write!(f, "file"),
            StoreProvider::Memory => write!(f, "memory"),
        }
    }
}

/// User property store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Backend to use.
    pub provider: StoreProvider,
    /// Path of the JSON document for the `file` provider.
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            provider: StoreProvider::default(),
            path: default_path(),
        }
    }
}

fn default_path() -> String {
    "data/userprops.json".to_string()
}
