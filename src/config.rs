use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// JSON-RPC endpoint of the wallet provider.
    #[serde(default = "default_provider_url")]
    pub provider_url: String,
    /// JSON-RPC endpoint of the deployed contract service. Defaults to
    /// the provider endpoint, the usual single-node setup.
    #[serde(default)]
    pub contract_url: Option<String>,
    /// Base URL of the avatar image service; the address is appended as
    /// a seed query parameter.
    #[serde(default = "default_avatar_base_url")]
    pub avatar_base_url: String,
    #[serde(default = "default_max_post_length")]
    pub max_post_length: usize,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_provider_url() -> String {
    "http://127.0.0.1:8545".to_string()
}

fn default_avatar_base_url() -> String {
    "https://api.dicebear.com/9.x/pixel-art/svg".to_string()
}

fn default_max_post_length() -> usize {
    280
}

fn default_request_timeout_secs() -> u64 {
    20
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider_url: default_provider_url(),
            contract_url: None,
            avatar_base_url: default_avatar_base_url(),
            max_post_length: default_max_post_length(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Config {
    /// Load from an explicit path, or from the platform config dir.
    /// A missing file means defaults; a file that fails to parse is an
    /// error the user should see.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path() {
                Some(p) if p.exists() => p,
                _ => return Ok(Self::default()),
            },
        };

        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: Config = toml::from_str(&raw)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        Ok(config)
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("chainfeed").join("config.toml"))
    }

    pub fn contract_url(&self) -> &str {
        self.contract_url.as_deref().unwrap_or(&self.provider_url)
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_secs)
    }
}
