//! # CLI Module
//!
//! User-facing command implementations. Each command coordinates the
//! Spotify and Last.fm clients, the token manager and the reconciler, and
//! owns all user interaction: progress spinners during the long fetch
//! phases, colored status macros, and the final diff summary table.
//!
//! ## Commands
//!
//! - [`auth`] - Interactive OAuth flow; the only command that binds the
//!   local callback server.
//! - [`sync`] - The unattended entry point: rebuilds the track universe,
//!   computes every desired playlist, and applies the minimal diffs.
//!   Supports `--only` to restrict the run to one playlist family and
//!   `--dry-run` to print the planned writes without applying them.
//!
//! ## Error Handling
//!
//! Commands bubble every failure up to a single `error!` call, which prints
//! the message and terminates with exit code 1 so an external scheduler
//! sees the run as failed. Nothing is written to any playlist unless every
//! desired set was computed successfully first.

mod auth;
mod sync;

pub use auth::auth;
pub use sync::{SyncScope, sync};
