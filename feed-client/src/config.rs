//! Configuration loading for feed-client.
//!
//! Configuration is loaded from a TOML file (default: `feed.toml`). Every
//! section and field is optional.

use feed_core::{InitializePolicy, RefreshPolicy, SyncPolicy};
use feed_types::ResourceKind;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedConfig {
    /// Storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Paging configuration.
    #[serde(default)]
    pub paging: PagingConfig,
    /// Per-kind policy overrides.
    #[serde(default)]
    pub policies: PoliciesConfig,
}

/// Storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path to SQLite database file.
    #[serde(default = "default_database_path")]
    pub database: PathBuf,
}

/// Paging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PagingConfig {
    /// Records per page (default: 20).
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Pause before each append fetch in milliseconds (default: 1000).
    #[serde(default = "default_append_delay_ms")]
    pub append_delay_ms: u64,
}

/// Policy overrides for every kind.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PoliciesConfig {
    /// General feed.
    #[serde(default)]
    pub feed: PolicyOverride,
    /// The user's own posts.
    #[serde(default)]
    pub my_posts: PolicyOverride,
    /// User directory.
    #[serde(default)]
    pub directory: PolicyOverride,
}

/// Override of a kind's default policy. Unset fields keep the default.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PolicyOverride {
    /// Refresh behavior.
    pub refresh: Option<RefreshPolicy>,
    /// Initialize behavior.
    pub initialize: Option<InitializePolicy>,
}

// Default value functions
fn default_database_path() -> PathBuf {
    PathBuf::from("feed-cache.db")
}

fn default_page_size() -> u32 {
    20
}

fn default_append_delay_ms() -> u64 {
    1000
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database: default_database_path(),
        }
    }
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            append_delay_ms: default_append_delay_ms(),
        }
    }
}

impl PagingConfig {
    /// Append pacing delay.
    pub fn append_delay(&self) -> Duration {
        Duration::from_millis(self.append_delay_ms)
    }
}

impl PoliciesConfig {
    /// Override configured for a kind.
    pub fn get(&self, kind: ResourceKind) -> &PolicyOverride {
        match kind {
            ResourceKind::Feed => &self.feed,
            ResourceKind::MyPosts => &self.my_posts,
            ResourceKind::Directory => &self.directory,
        }
    }
}

impl FeedConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Effective policy of a kind: its default, the configured override,
    /// and the configured append delay.
    pub fn policy_for(&self, kind: ResourceKind) -> SyncPolicy {
        let mut policy = SyncPolicy::for_kind(kind).with_append_delay(self.paging.append_delay());
        let custom = self.policies.get(kind);
        if let Some(refresh) = custom.refresh {
            policy.refresh = refresh;
        }
        if let Some(initialize) = custom.initialize {
            policy.initialize = initialize;
        }
        policy
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Failed to parse configuration file.
    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: toml::de::Error,
    },
}
