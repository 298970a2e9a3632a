//! Credential storage.
//!
//! A successful login yields a session id and an opaque certificate token;
//! both are persisted as JSON at `<config_dir>/scoutctl/credentials.json`
//! and attached to every privileged request. The file is replaced wholesale
//! on re-login, never partially updated.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

const CREDENTIALS_FILE: &str = "credentials.json";

/// One authenticated session. Field names on disk match the backend's
/// `uuid`/`certificate` login response headers as the original client
/// recorded them, so existing credential files keep working.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    #[serde(rename = "UUID")]
    pub session_id: String,
    #[serde(rename = "Certificate")]
    pub certificate: String,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no stored credentials; run `scoutctl login` first")]
    Missing,

    #[error("stored credentials are malformed: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("failed to access credential file: {0}")]
    Io(#[from] std::io::Error),
}

/// Reads and writes the credential file under a fixed directory. The
/// directory is injectable so tests point it at a tempdir.
pub struct CredentialStore {
    dir: PathBuf,
}

impl CredentialStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        CredentialStore { dir: dir.into() }
    }

    fn path(&self) -> PathBuf {
        self.dir.join(CREDENTIALS_FILE)
    }

    /// Write `credential` to disk, creating the config directory if needed
    /// and replacing any prior content.
    pub fn save(&self, credential: &Credential) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir)?;
        let contents = serde_json::to_string(credential)?;
        std::fs::write(self.path(), contents)?;
        Ok(())
    }

    /// Load the stored credential, distinguishing a missing file from a
    /// malformed one.
    pub fn load(&self) -> Result<Credential, StoreError> {
        let contents = match std::fs::read_to_string(self.path()) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::Missing)
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&contents)?)
    }

    /// The lenient read used by request dispatch: a missing or malformed
    /// file degrades to an empty credential, which simply fails server-side
    /// authentication rather than aborting locally.
    pub fn load_or_default(&self) -> Credential {
        self.load().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_then_load_round_trips_exactly() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path());
        let credential = Credential {
            session_id: "3f2a-uuid".into(),
            certificate: "cert-token-xyz".into(),
        };
        store.save(&credential).unwrap();
        assert_eq!(store.load().unwrap(), credential);
    }

    #[test]
    fn load_missing_file_is_missing_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path());
        assert!(matches!(store.load(), Err(StoreError::Missing)));
        assert_eq!(store.load_or_default(), Credential::default());
    }

    #[test]
    fn load_malformed_file_degrades_to_default() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CREDENTIALS_FILE), "not json").unwrap();
        let store = CredentialStore::new(dir.path());
        assert!(matches!(store.load(), Err(StoreError::Malformed(_))));
        assert_eq!(store.load_or_default(), Credential::default());
    }

    #[test]
    fn save_overwrites_prior_credential() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path());
        store
            .save(&Credential {
                session_id: "old".into(),
                certificate: "old-cert".into(),
            })
            .unwrap();
        let newer = Credential {
            session_id: "new".into(),
            certificate: "new-cert".into(),
        };
        store.save(&newer).unwrap();
        assert_eq!(store.load().unwrap(), newer);
    }

    #[test]
    fn disk_format_uses_backend_field_names() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path());
        store
            .save(&Credential {
                session_id: "id".into(),
                certificate: "cert".into(),
            })
            .unwrap();
        let raw = std::fs::read_to_string(dir.path().join(CREDENTIALS_FILE)).unwrap();
        assert!(raw.contains("\"UUID\""));
        assert!(raw.contains("\"Certificate\""));
    }
}
