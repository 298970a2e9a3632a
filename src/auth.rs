//! Login flow: key exchange and password encryption.
//!
//! The backend publishes a PKCS#1 RSA public key at `/pub`. A login fetches
//! that key fresh (never cached), encrypts the raw password bytes under it
//! with PKCS#1 v1.5 padding, and POSTs `{Username, EncryptedPassword}` to
//! `/login`. The encrypted bytes ride as base64 in the JSON body. On
//! success the server hands back a session id and certificate in the `uuid`
//! and `certificate` response headers, which become the stored credential
//! for every privileged request until the next login.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rsa::pkcs1::DecodeRsaPublicKey;
use rsa::{Pkcs1v15Encrypt, RsaPublicKey};
use serde::Serialize;
use thiserror::Error;

use crate::api::{ApiClient, ApiError};
use crate::credentials::{Credential, CredentialStore, StoreError};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The `/pub` body was not valid PEM or not a PKCS#1 public key. Fatal:
    /// login cannot proceed without a key to encrypt under.
    #[error("server returned an invalid public key: {0}")]
    InvalidPublicKey(#[from] rsa::pkcs1::Error),

    #[error("password encryption failed: {0}")]
    Encrypt(#[from] rsa::Error),

    #[error("failed to save credentials: {0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, Serialize)]
struct LoginRequest {
    #[serde(rename = "Username")]
    username: String,
    /// Base64 ciphertext; the backend decodes JSON byte arrays this way.
    #[serde(rename = "EncryptedPassword")]
    encrypted_password: String,
}

/// Fetch and decode the server's RSA public key. The server is trusted; the
/// only check is that the PEM and key decodes succeed.
pub fn fetch_public_key(api: &ApiClient) -> Result<RsaPublicKey, AuthError> {
    let pem = api.fetch_public_key_pem()?;
    Ok(RsaPublicKey::from_pkcs1_pem(&pem)?)
}

/// PKCS#1 v1.5 encryption of the raw password bytes. Padding is randomized,
/// so repeated calls yield distinct ciphertexts for the same plaintext.
pub fn encrypt_password(key: &RsaPublicKey, password: &str) -> Result<Vec<u8>, AuthError> {
    let mut rng = rand::thread_rng();
    Ok(key.encrypt(&mut rng, Pkcs1v15Encrypt, password.as_bytes())?)
}

/// Authenticate and record the issued credential. Returns the response body
/// for display. The stored credential is replaced only when the server
/// returns both the `uuid` and `certificate` headers; otherwise whatever
/// was stored before stays in place.
pub fn login(
    api: &ApiClient,
    store: &CredentialStore,
    username: &str,
    password: &str,
) -> Result<String, AuthError> {
    let key = fetch_public_key(api)?;
    let encrypted = encrypt_password(&key, password)?;

    let payload = LoginRequest {
        username: username.to_string(),
        encrypted_password: BASE64.encode(encrypted),
    };
    let response = api.post_login(&payload)?;

    let header = |name: &str| {
        response
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let issued = match (header("uuid"), header("certificate")) {
        (Some(session_id), Some(certificate)) => Some(Credential {
            session_id,
            certificate,
        }),
        _ => None,
    };

    let body = response.text().map_err(ApiError::Body)?;

    if let Some(credential) = issued {
        store.save(&credential)?;
    }

    Ok(body)
}

#[cfg(test)]
mod tests {
    use rsa::pkcs1::{EncodeRsaPublicKey, LineEnding};
    use rsa::RsaPrivateKey;

    use super::*;

    fn test_key() -> RsaPrivateKey {
        let mut rng = rand::thread_rng();
        RsaPrivateKey::new(&mut rng, 1024).unwrap()
    }

    #[test]
    fn encrypting_twice_yields_distinct_ciphertexts() {
        let private = test_key();
        let public = RsaPublicKey::from(&private);

        let first = encrypt_password(&public, "hunter2").unwrap();
        let second = encrypt_password(&public, "hunter2").unwrap();
        assert_ne!(first, second);

        // Both still decrypt to the same plaintext.
        assert_eq!(private.decrypt(Pkcs1v15Encrypt, &first).unwrap(), b"hunter2");
        assert_eq!(private.decrypt(Pkcs1v15Encrypt, &second).unwrap(), b"hunter2");
    }

    #[test]
    fn pkcs1_pem_round_trips_through_decode() {
        let public = RsaPublicKey::from(&test_key());
        let pem = public.to_pkcs1_pem(LineEnding::LF).unwrap();
        assert_eq!(RsaPublicKey::from_pkcs1_pem(&pem).unwrap(), public);
    }

    #[test]
    fn garbage_pem_is_rejected() {
        assert!(RsaPublicKey::from_pkcs1_pem("not a key").is_err());
    }
}
