//! High-level lifecycle management.
//!
//! Holds the token manager that every Spotify call borrows for a valid
//! bearer token. Sync state is deliberately not managed here; each run
//! re-derives everything from the remote services.

mod auth;

pub use auth::TokenManager;
