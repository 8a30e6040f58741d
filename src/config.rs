//! Configuration management for the playlist sync engine.
//!
//! This module handles loading configuration from environment variables and
//! `.env` files and exposes it as an explicit [`Config`] struct that is built
//! once at startup and passed into each component. Components never read the
//! environment themselves; this keeps fixture configurations trivial in tests
//! and removes hidden coupling on ambient globals.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)

use std::{env, path::PathBuf, time::Duration};

/// Spotify Web API base URL.
pub const SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";

/// Spotify OAuth authorization endpoint.
pub const SPOTIFY_AUTH_URL: &str = "https://accounts.spotify.com/authorize";

/// Spotify OAuth token exchange endpoint.
pub const SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

/// Last.fm API root. All methods are query parameters on this URL.
pub const LASTFM_API_URL: &str = "https://ws.audioscrobbler.com/2.0/";

/// OAuth scope requested during authorization. Covers reading the library
/// and source playlists plus modifying the managed target playlists.
pub const SPOTIFY_SCOPE: &str =
    "user-library-read user-follow-read playlist-read-private playlist-modify-public playlist-modify-private";

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the necessary directory structure if it doesn't exist and loads
/// environment variables from a `.env` file located in the platform-specific
/// local data directory under `sposync/.env`. This allows users to store
/// configuration securely without hardcoding sensitive values.
///
/// # Directory Structure
///
/// The function looks for the `.env` file in:
/// - Linux: `~/.local/share/sposync/.env`
/// - macOS: `~/Library/Application Support/sposync/.env`
/// - Windows: `%LOCALAPPDATA%/sposync/.env`
///
/// A missing file is not an error; unattended runs typically provide their
/// configuration through the process environment.
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created.
pub async fn load_env() -> Result<(), String> {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("sposync/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

/// Runtime configuration, built once from the environment at startup.
///
/// Every component receives the parts of this struct it needs at
/// construction; nothing reads environment variables after
/// [`Config::from_env`] returns.
#[derive(Debug, Clone)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub server_address: String,

    /// Source playlist id(s). The variable is a single id in the common
    /// case but accepts a comma-separated list.
    pub source_playlist_ids: Vec<String>,
    pub target_playlist_name: String,
    pub top_playlist_name: String,
    pub bottom_playlist_name: String,
    pub new_releases_playlist_name: String,

    pub lastfm_api_key: String,
    pub lastfm_username: String,
    pub lastfm_period: String,
    pub lastfm_request_delay: Duration,

    pub recency_window_days: i64,
    pub playcount_playlist_size: usize,
    pub new_releases_lookback_hours: i64,
}

impl Config {
    /// Builds the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error naming the variable when a required value is missing
    /// or a numeric value fails to parse.
    pub fn from_env() -> Result<Self, String> {
        Ok(Config {
            client_id: required("CLIENT_ID")?,
            client_secret: required("CLIENT_SECRET")?,
            redirect_uri: required("REDIRECT_URI")?,
            server_address: or_default("SERVER_ADDRESS", "127.0.0.1:8080"),

            source_playlist_ids: required("SOURCE_PLAYLIST_ID")?
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            target_playlist_name: or_default("TARGET_PLAYLIST_NAME", "Recently Added"),
            top_playlist_name: or_default("TOP_25_PLAYLIST_NAME", "Top 25"),
            bottom_playlist_name: or_default("BOTTOM_25_PLAYLIST_NAME", "Bottom 25"),
            new_releases_playlist_name: or_default("NEW_RELEASES_PLAYLIST_NAME", "The News"),

            lastfm_api_key: required("LASTFM_API_KEY")?,
            lastfm_username: required("LASTFM_USERNAME")?,
            lastfm_period: or_default("LASTFM_PERIOD", "1month"),
            lastfm_request_delay: Duration::from_millis(parsed_or(
                "LASTFM_REQUEST_DELAY_MS",
                250,
            )?),

            recency_window_days: parsed_or("RECENCY_WINDOW_DAYS", 30)?,
            playcount_playlist_size: parsed_or("PLAYCOUNT_PLAYLIST_SIZE", 25)?,
            new_releases_lookback_hours: parsed_or("NEW_RELEASES_LOOKBACK_HOURS", 24)?,
        })
    }
}

fn required(name: &str) -> Result<String, String> {
    env::var(name).map_err(|_| format!("{} must be set", name))
}

fn or_default(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parsed_or<T: std::str::FromStr>(name: &str, default: T) -> Result<T, String> {
    match env::var(name) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|_| format!("{} has an invalid value '{}'", name, raw)),
        Err(_) => Ok(default),
    }
}
