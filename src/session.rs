//! Pre-flight checks that gate privileged commands.
//!
//! Two distinct failures must never be conflated: a certificate the server
//! rejects ("log in again") and a server that cannot be reached at all
//! ("check the address"). When `/certificateValid` comes back non-success,
//! a probe of the root path decides which message the user sees.

use thiserror::Error;

use crate::api::ApiClient;
use crate::config::Config;
use crate::credentials::CredentialStore;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Please enter an address for the server using `scoutctl update-address`")]
    NoAddress,

    #[error("Certificate Invalid. Please log in with `scoutctl login`")]
    CertificateInvalid,

    #[error("Server offline. Please make sure {address} is the right address.")]
    ServerOffline { address: String },
}

/// Fails when no backend address has ever been configured. Runs before any
/// network activity.
pub fn check_address_configured(config: &Config) -> Result<(), SessionError> {
    if config.address.is_empty() {
        return Err(SessionError::NoAddress);
    }
    Ok(())
}

/// Validates the stored certificate against the server. Non-success (or no
/// response at all) triggers the reachability probe: a server that answers
/// the root path has rejected the credential; one that does not is offline.
pub fn check_certificate_valid(
    api: &ApiClient,
    store: &CredentialStore,
) -> Result<(), SessionError> {
    let certificate = store.load_or_default().certificate;

    match api.certificate_valid(&certificate) {
        Ok(status) if status.is_success() => Ok(()),
        Ok(_) | Err(_) => {
            if api.is_reachable(&certificate) {
                Err(SessionError::CertificateInvalid)
            } else {
                Err(SessionError::ServerOffline {
                    address: api.base_url().to_string(),
                })
            }
        }
    }
}
