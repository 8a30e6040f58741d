use std::time::Duration;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, NaiveDate, Utc};
use rand::{Rng, distr::Alphanumeric};
use reqwest::StatusCode;
use sha2::{Digest, Sha256};

pub fn generate_code_verifier() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(128)
        .map(char::from)
        .collect()
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Case-insensitive match key for resolving scrobble records against the
/// library snapshot. The ranking service has no native track identifier, so
/// (artist, title) is the only join available.
pub fn match_key(artist: &str, title: &str) -> String {
    format!(
        "{}|||{}",
        artist.trim().to_lowercase(),
        title.trim().to_lowercase()
    )
}

pub fn parse_added_at(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

// Release dates come in day, month or year precision; coarser values are
// normalized to the first day of the period.
pub fn normalize_release_date(raw: &str) -> Option<NaiveDate> {
    let padded = match raw.len() {
        4 => format!("{}-01-01", raw),
        7 => format!("{}-01", raw),
        _ => raw.to_string(),
    };
    NaiveDate::parse_from_str(&padded, "%Y-%m-%d").ok()
}

/// Bounded retry with exponential backoff, shared by every outbound reader
/// and writer. The policy only decides *whether* and *how long* to wait;
/// the call sites keep their own loops.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt)
    }

    pub fn attempts_left(&self, attempt: u32) -> bool {
        attempt + 1 < self.max_attempts
    }

    pub fn is_retryable_status(status: StatusCode) -> bool {
        status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
    }
}
