//! Configuration resolution for feed-cli.

use anyhow::{Context, Result};
use feed_client::FeedConfig;
use std::path::Path;

/// Default configuration file name inside the data directory.
pub const CONFIG_FILE: &str = "feed.toml";

/// Load the configuration.
///
/// An explicit path must exist. Without one, `<data_dir>/feed.toml` is used
/// when present, else the defaults. A relative database path is resolved
/// against the data directory.
pub fn load(explicit: Option<&Path>, data_dir: &Path) -> Result<FeedConfig> {
    let mut config = match explicit {
        Some(path) => FeedConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => {
            let path = data_dir.join(CONFIG_FILE);
            if path.exists() {
                FeedConfig::from_file(&path).context("Invalid configuration in data directory")?
            } else {
                FeedConfig::default()
            }
        }
    };

    if config.storage.database.is_relative() {
        config.storage.database = data_dir.join(&config.storage.database);
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_without_file() {
        let dir = tempdir().unwrap();
        let config = load(None, dir.path()).unwrap();

        assert_eq!(config.storage.database, dir.path().join("feed-cache.db"));
        assert_eq!(config.paging.page_size, 20);
    }

    #[test]
    fn picks_up_file_in_data_dir() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "[paging]\npage_size = 7\n",
        )
        .unwrap();

        let config = load(None, dir.path()).unwrap();
        assert_eq!(config.paging.page_size, 7);
    }

    #[test]
    fn absolute_database_path_is_kept() {
        let dir = tempdir().unwrap();
        let db = dir.path().join("elsewhere").join("cache.db");
        let file = dir.path().join("custom.toml");
        std::fs::write(
            &file,
            format!("[storage]\ndatabase = {:?}\n", db.to_string_lossy()),
        )
        .unwrap();

        let config = load(Some(&file), dir.path()).unwrap();
        assert_eq!(config.storage.database, db);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempdir().unwrap();
        let result = load(Some(&dir.path().join("nope.toml")), dir.path());
        assert!(result.is_err());
    }
}
