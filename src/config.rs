//! Server address configuration.
//!
//! The backend base URL is persisted as plain text at
//! `<config_dir>/scoutctl/address.txt`. It is read once per invocation into
//! a `Config` value that is passed to the components that need it, and only
//! the `update-address` command writes it back.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Subdirectory of the user configuration directory holding our state.
pub const APP_DIR: &str = "scoutctl";

const ADDRESS_FILE: &str = "address.txt";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not locate a user configuration directory")]
    NoConfigDir,

    #[error("failed to access address file: {0}")]
    Io(#[from] std::io::Error),
}

/// Per-invocation configuration. Constructed in `main` and handed to the
/// API client and session validator instead of living in process globals.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Base URL of the backend, e.g. `http://localhost:8080`. Empty when
    /// the user has never run `update-address`.
    pub address: String,
}

impl Config {
    /// Load the configured address from `dir`. A missing file yields an
    /// empty address; callers gate on that via the session validator.
    pub fn load_from(dir: &Path) -> Result<Self, ConfigError> {
        let path = dir.join(ADDRESS_FILE);
        match std::fs::read_to_string(&path) {
            Ok(address) => Ok(Config { address }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Config::default()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Persist a new backend address, replacing any prior value. The string is
/// stored exactly as given, with no trailing transformation.
pub fn update_address(dir: &Path, new_address: &str) -> Result<(), ConfigError> {
    std::fs::create_dir_all(dir)?;
    std::fs::write(dir.join(ADDRESS_FILE), new_address)?;
    Ok(())
}

/// The default location for scoutctl state under the user's config dir.
pub fn default_config_dir() -> Result<PathBuf, ConfigError> {
    let base = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    Ok(base.join(APP_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_then_load_returns_exact_address() {
        let dir = tempfile::tempdir().unwrap();
        update_address(dir.path(), "http://host:1234").unwrap();
        let config = Config::load_from(dir.path()).unwrap();
        assert_eq!(config.address, "http://host:1234");
    }

    #[test]
    fn load_with_no_file_yields_empty_address() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(dir.path()).unwrap();
        assert!(config.address.is_empty());
    }

    #[test]
    fn update_replaces_prior_address() {
        let dir = tempfile::tempdir().unwrap();
        update_address(dir.path(), "http://old:1").unwrap();
        update_address(dir.path(), "http://new:2").unwrap();
        let config = Config::load_from(dir.path()).unwrap();
        assert_eq!(config.address, "http://new:2");
    }
}
