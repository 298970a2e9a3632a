// Library root
// -----------
// This crate exposes a small library surface for the CLI. The binary
// (`main.rs`) wires these modules to the subcommand surface.
//
// Module responsibilities:
// - `config`: loads/saves the backend address under the user config dir.
// - `credentials`: persists the session id + certificate issued at login.
// - `api`: one blocking HTTP call per backend endpoint, raw-text responses.
// - `auth`: public-key fetch, password encryption, and the login exchange.
// - `session`: pre-flight address/certificate checks for privileged calls.
//
// Keeping the HTTP and persistence logic out of `main.rs` makes each piece
// testable against a mock server with an injected config directory.
pub mod api;
pub mod auth;
pub mod config;
pub mod credentials;
pub mod session;
