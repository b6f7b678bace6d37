//! Configuration — networks, chunk sizes, and endpoint URLs.
//!
//! Resolution order: environment variables → config file → defaults.
//!
//! Config file location:
//!   1. $FILECHAIN_CONFIG (explicit override)
//!   2. $XDG_CONFIG_HOME/filechain/config.toml
//!   3. ~/.config/filechain/config.toml

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default chunk payload size: 256 KiB.
pub const DEFAULT_CHUNK_SIZE: usize = 256 * 1024;

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilechainConfig {
    /// Name of the network used when none is given on the command line.
    pub default_network: String,
    pub networks: Vec<NetworkConfig>,
}

/// One target network. Chunk size is a per-network default — different
/// chains accept different payload sizes per transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub name: String,
    /// Base URL of the node's ledger API.
    pub rpc_url: String,
    /// Explorer base; audit links are `{explorer_url}/extrinsic/{tx}`.
    pub explorer_url: String,
    /// Chunk payload size in bytes for uploads on this network.
    pub chunk_size: usize,
}

// ── Defaults ──────────────────────────────────────────────────────────────────

impl Default for FilechainConfig {
    fn default() -> Self {
        Self {
            default_network: "local".into(),
            networks: vec![
                NetworkConfig::default(),
                NetworkConfig {
                    name: "testnet".into(),
                    rpc_url: "http://testnet.filechain.example:9620/api".into(),
                    explorer_url: "http://explorer.filechain.example".into(),
                    chunk_size: DEFAULT_CHUNK_SIZE,
                },
            ],
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            name: "local".into(),
            rpc_url: "http://127.0.0.1:9620/api".into(),
            explorer_url: "http://127.0.0.1:9620/explorer".into(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {0}: {1}")]
    ReadFailed(PathBuf, std::io::Error),
    #[error("failed to parse {0}: {1}")]
    ParseFailed(PathBuf, toml::de::Error),
    #[error("failed to write {0}: {1}")]
    WriteFailed(PathBuf, std::io::Error),
    #[error("failed to serialize: {0}")]
    SerializeFailed(toml::ser::Error),
    #[error("no network named {0:?} in config")]
    UnknownNetwork(String),
}

// ── Loading ───────────────────────────────────────────────────────────────────

impl FilechainConfig {
    /// Load config: env vars → file → defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::file_path();
        let mut config = if path.exists() {
            let text = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadFailed(path.clone(), e))?;
            toml::from_str(&text).map_err(|e| ConfigError::ParseFailed(path.clone(), e))?
        } else {
            FilechainConfig::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Config file path.
    pub fn file_path() -> PathBuf {
        std::env::var("FILECHAIN_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| config_dir().join("config.toml"))
    }

    /// Write default config if none exists. Returns the path.
    pub fn write_default_if_missing() -> Result<PathBuf, ConfigError> {
        let path = Self::file_path();
        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| ConfigError::WriteFailed(path.clone(), e))?;
            }
            let text = toml::to_string_pretty(&FilechainConfig::default())
                .map_err(ConfigError::SerializeFailed)?;
            std::fs::write(&path, text).map_err(|e| ConfigError::WriteFailed(path.clone(), e))?;
        }
        Ok(path)
    }

    /// Look up a network by name.
    pub fn network(&self, name: &str) -> Result<&NetworkConfig, ConfigError> {
        self.networks
            .iter()
            .find(|n| n.name == name)
            .ok_or_else(|| ConfigError::UnknownNetwork(name.to_string()))
    }

    /// The configured default network, or the first one listed.
    pub fn default_network(&self) -> Result<&NetworkConfig, ConfigError> {
        self.network(&self.default_network)
            .or_else(|_| {
                self.networks
                    .first()
                    .ok_or_else(|| ConfigError::UnknownNetwork(self.default_network.clone()))
            })
    }

    /// Apply FILECHAIN_* env var overrides.
    ///
    /// FILECHAIN_DEFAULT_NETWORK selects the network; FILECHAIN_RPC_URL and
    /// FILECHAIN_CHUNK_SIZE override that network's endpoint and chunk size.
    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("FILECHAIN_DEFAULT_NETWORK") {
            self.default_network = v;
        }
        let selected = self.default_network.clone();
        if let Some(network) = self.networks.iter_mut().find(|n| n.name == selected) {
            if let Ok(v) = std::env::var("FILECHAIN_RPC_URL") {
                network.rpc_url = v;
            }
            if let Ok(v) = std::env::var("FILECHAIN_CHUNK_SIZE") {
                if let Ok(size) = v.parse() {
                    network.chunk_size = size;
                }
            }
        }
    }
}

// ── Path helpers ──────────────────────────────────────────────────────────────

fn config_dir() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| dirs_or_home().join(".config"))
        .join("filechain")
}

fn dirs_or_home() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
}
