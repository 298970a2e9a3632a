//! HTTP request dispatch.
//!
//! Every command maps to exactly one request against the configured backend
//! address: GET for reads, POST for writes, with the stored certificate
//! attached as a `Certificate` header on privileged calls. Responses are
//! returned as raw text and printed verbatim; this client performs no
//! structural validation of response content.

use std::str::FromStr;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::StatusCode;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure: the request went out but nothing came back.
    #[error("Server did not return a response.")]
    NoResponse(#[source] reqwest::Error),

    #[error("failed to build HTTP client: {0}")]
    Client(reqwest::Error),

    #[error("failed to read response body: {0}")]
    Body(reqwest::Error),
}

/// How a leaderboard score mutation is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Modification {
    Increase,
    Decrease,
    Set,
}

impl FromStr for Modification {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "increase" => Ok(Modification::Increase),
            "decrease" => Ok(Modification::Decrease),
            "set" => Ok(Modification::Set),
            other => Err(format!(
                "unknown modification '{other}', expected Increase, Decrease, or Set"
            )),
        }
    }
}

/// Body of a `/modScore` request. Field names are the backend's.
#[derive(Debug, Serialize)]
pub struct ScoreModification {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "By")]
    pub by: i64,
    #[serde(rename = "Mod")]
    pub modification: Modification,
}

/// Body of an `/addBadge` request. The target username travels as a header,
/// not here; the backend keeps bodies minimal for simple commands.
#[derive(Debug, Serialize)]
pub struct Badge {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Description")]
    pub description: String,
}

/// Blocking HTTP client bound to the configured backend address.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        // Transport-level certificate verification is deliberately disabled:
        // deployments run against self-signed localhost endpoints, and the
        // password is separately RSA-encrypted before it leaves the client
        // (see the auth module). Changing this changes the wire trust model.
        let client = Client::builder()
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(ApiError::Client)?;
        Ok(ApiClient {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        request.send().map_err(ApiError::NoResponse)
    }

    fn body_text(response: Response) -> Result<String, ApiError> {
        response.text().map_err(ApiError::Body)
    }

    /// POST `/login` with the serialized login payload; the caller (auth
    /// module) extracts the `uuid`/`certificate` headers from the response.
    pub fn post_login<T: Serialize>(&self, payload: &T) -> Result<Response, ApiError> {
        self.send(self.client.post(self.url("/login")).json(payload))
    }

    /// GET `/pub`: the server's PEM-armored RSA public key.
    pub fn fetch_public_key_pem(&self) -> Result<String, ApiError> {
        let response = self.send(self.client.get(self.url("/pub")))?;
        Self::body_text(response)
    }

    /// GET `/keyChange` with the new event key as a raw body. A GET with a
    /// body is a quirk of the backend's wire contract, preserved as-is.
    pub fn key_change(&self, certificate: &str, new_key: &str) -> Result<String, ApiError> {
        let response = self.send(
            self.client
                .get(self.url("/keyChange"))
                .header("Certificate", certificate)
                .body(new_key.to_string()),
        )?;
        Self::body_text(response)
    }

    /// GET `/schedule`: the full event schedule. Unauthenticated.
    pub fn schedule(&self) -> Result<String, ApiError> {
        let response = self.send(self.client.get(self.url("/schedule")))?;
        Self::body_text(response)
    }

    /// GET `/singleSchedule`: one scouter's schedule. The scouter name is
    /// carried in the `userInput` header, matching the backend contract.
    pub fn scouter_schedule(&self, certificate: &str, scouter: &str) -> Result<String, ApiError> {
        let response = self.send(
            self.client
                .get(self.url("/singleSchedule"))
                .header("Certificate", certificate)
                .header("userInput", scouter),
        )?;
        Self::body_text(response)
    }

    /// GET `/leaderboard`. Unauthenticated.
    pub fn leaderboard(&self) -> Result<String, ApiError> {
        let response = self.send(self.client.get(self.url("/leaderboard")))?;
        Self::body_text(response)
    }

    /// POST `/modScore` with a JSON score mutation.
    pub fn modify_score(
        &self,
        certificate: &str,
        modification: &ScoreModification,
    ) -> Result<String, ApiError> {
        let response = self.send(
            self.client
                .post(self.url("/modScore"))
                .header("Certificate", certificate)
                .json(modification),
        )?;
        Self::body_text(response)
    }

    /// POST `/addBadge`. The target username travels in the `Username`
    /// header alongside the JSON badge body.
    pub fn add_badge(
        &self,
        certificate: &str,
        username: &str,
        badge: &Badge,
    ) -> Result<String, ApiError> {
        let response = self.send(
            self.client
                .post(self.url("/addBadge"))
                .header("Certificate", certificate)
                .header("Username", username)
                .json(badge),
        )?;
        Self::body_text(response)
    }

    /// GET `/allUsers`: every registered user.
    pub fn all_users(&self, certificate: &str) -> Result<String, ApiError> {
        let response = self.send(
            self.client
                .get(self.url("/allUsers"))
                .header("Certificate", certificate),
        )?;
        Self::body_text(response)
    }

    /// POST `/sheetChange` with the new sheet id as a plain-text body.
    pub fn update_sheet(&self, new_sheet: &str) -> Result<String, ApiError> {
        let response = self.send(
            self.client
                .post(self.url("/sheetChange"))
                .header("Content-Type", "text/plain")
                .body(new_sheet.to_string()),
        )?;
        Self::body_text(response)
    }

    /// GET `/certificateValid`: returns the raw status so the session
    /// validator can disambiguate a bad credential from a dead server.
    pub fn certificate_valid(&self, certificate: &str) -> Result<StatusCode, ApiError> {
        let response = self.send(
            self.client
                .get(self.url("/certificateValid"))
                .header("Certificate", certificate),
        )?;
        Ok(response.status())
    }

    /// GET `/`: liveness probe. Success means "any response arrived",
    /// regardless of status.
    pub fn is_reachable(&self, certificate: &str) -> bool {
        self.send(
            self.client
                .get(self.url("/"))
                .header("Certificate", certificate),
        )
        .is_ok()
    }
}
