//! # API Module
//!
//! HTTP endpoints for the local callback server used during interactive
//! authentication.
//!
//! ## Endpoints
//!
//! - [`callback`] - Handles the OAuth callback from Spotify's authorization
//!   server and completes the code-for-token exchange.
//! - [`health`] - Health check returning application status and version.
//!
//! The server only runs for the duration of `sposync auth`; unattended sync
//! runs never bind it.

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
