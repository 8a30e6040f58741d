//! # Last.fm Integration Module
//!
//! Client for the scrobble-history service that supplies per-track play
//! counts. The service knows nothing about Spotify identifiers, so every
//! record it returns is resolved against the library snapshot by a
//! case-insensitive normalized (artist, title) key; records that match no
//! library track are dropped, never invented as new tracks.
//!
//! ## Rate Limiting
//!
//! The service enforces request-rate limits. Requests are therefore
//! strictly sequential (at most one in flight) with a configurable
//! inter-request delay between pages; a 429 response honors the
//! `Retry-After` header and does not consume the retry budget.

mod tracks;

pub use tracks::{get_top_tracks, resolve_records};
