//! # Spotify Integration Module
//!
//! Interface to the Spotify Web API: authentication, library and playlist
//! reads, followed-artist and release lookups, and the batched playlist
//! write operations the reconciler applies. All HTTP communication, rate
//! limiting and retry behavior for Spotify lives here.
//!
//! ## Core Modules
//!
//! - [`auth`] - OAuth 2.0 authorization-code flow with PKCE, local callback
//!   server, token exchange and persistence
//! - [`library`] - source playlist and Liked Songs pagination (the Library
//!   Reader)
//! - [`artists`] - followed artists with cursor pagination
//! - [`releases`] - artist releases and batched album track listings
//! - [`playlist`] - playlist lookup/create and batched add/remove writes
//!
//! ## Request Handling
//!
//! Every read goes through [`get_json`], which owns the retry loop: a
//! bounded timeout per request, 429 handled via the `Retry-After` header
//! (up to a 120 second cap), 5xx and timeouts retried with exponential
//! backoff per the injected [`RetryPolicy`], 401/403 surfaced as
//! non-retryable auth errors. Writes are deliberately single-attempt so a
//! partially applied batch is reported instead of blindly repeated.
//!
//! ## API Coverage
//!
//! - `GET /me/tracks`, `GET /playlists/{id}/tracks` - library reads
//! - `GET /me/following?type=artist` - followed artists
//! - `GET /artists/{id}/albums`, `GET /albums` - release discovery
//! - `GET /me/playlists`, `GET /me`, `POST /users/{id}/playlists` -
//!   playlist resolution
//! - `POST|DELETE /playlists/{id}/tracks` - reconciliation writes
//! - `POST /api/token` - token exchange and refresh

pub mod artists;
pub mod auth;
pub mod library;
pub mod playlist;
pub mod releases;

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tokio::time::sleep;

use crate::{
    management::TokenManager,
    types::SyncError,
    utils::RetryPolicy,
    warning,
};

// Every external call carries a bounded timeout; exceeding it is treated
// like any other transient network failure.
pub(crate) fn http_client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Authenticated GET returning a deserialized JSON body.
///
/// Owns the full retry loop so that the per-endpoint functions stay plain
/// pagination code. Rate-limit waits do not consume the retry budget.
pub(crate) async fn get_json<T: DeserializeOwned>(
    url: &str,
    token_mgr: &mut TokenManager,
    retry: &RetryPolicy,
) -> Result<T, SyncError> {
    let client = http_client();
    let mut attempt: u32 = 0;

    loop {
        let token = token_mgr.get_valid_token().await?;
        let response = client.get(url).bearer_auth(&token).send().await;

        let err = match response {
            Ok(resp) => {
                if resp.status() == StatusCode::TOO_MANY_REQUESTS {
                    let retry_after = resp
                        .headers()
                        .get("retry-after")
                        .and_then(|v| v.to_str().ok())
                        .and_then(|v| v.parse::<u64>().ok())
                        .unwrap_or(1);
                    if retry_after <= 120 {
                        sleep(Duration::from_secs(retry_after)).await;
                        continue;
                    }
                    warning!(
                        "Retry-After has reached an abnormal high of {} seconds.",
                        retry_after
                    );
                    return Err(SyncError::Transient(format!(
                        "rate limited for {} seconds",
                        retry_after
                    )));
                }
                match resp.error_for_status() {
                    Ok(valid_response) => {
                        return valid_response.json::<T>().await.map_err(SyncError::from);
                    }
                    Err(err) => err,
                }
            }
            Err(err) => err,
        };

        let sync_err = SyncError::from(err);
        if matches!(sync_err, SyncError::Transient(_)) && retry.attempts_left(attempt) {
            sleep(retry.delay_for(attempt)).await;
            attempt += 1;
            continue;
        }
        return Err(sync_err);
    }
}
