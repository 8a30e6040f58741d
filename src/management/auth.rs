use std::path::PathBuf;

use chrono::Utc;
use reqwest::Client;

use crate::{
    config::{self, Config},
    types::{SyncError, Token},
};

/// Owns the persisted OAuth token and refreshes it transparently.
///
/// Injected into both readers and the playlist writer so that no call site
/// ever deals with token expiry itself. The token lives as JSON in the local
/// data directory and is rewritten after every successful refresh.
pub struct TokenManager {
    token: Token,
    client_id: String,
    client_secret: String,
}

impl TokenManager {
    pub fn new(token: Token, cfg: &Config) -> Self {
        TokenManager {
            token,
            client_id: cfg.client_id.clone(),
            client_secret: cfg.client_secret.clone(),
        }
    }

    pub async fn load(cfg: &Config) -> Result<Self, SyncError> {
        let path = Self::token_path();
        let content = async_fs::read_to_string(&path)
            .await
            .map_err(|e| SyncError::Auth(format!("no cached token ({}), run sposync auth", e)))?;
        let token: Token = serde_json::from_str(&content)
            .map_err(|e| SyncError::Auth(format!("corrupt token cache: {}", e)))?;
        Ok(Self::new(token, cfg))
    }

    pub async fn persist(&self) -> Result<(), String> {
        let path = Self::token_path();
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(&self.token).map_err(|e| e.to_string())?;
        async_fs::write(Self::token_path(), json)
            .await
            .map_err(|e| e.to_string())
    }

    /// Returns a valid access token, refreshing first when the current one
    /// is within the expiry buffer.
    pub async fn get_valid_token(&mut self) -> Result<String, SyncError> {
        if self.is_expired() {
            let new_token = self.refresh_token().await?;
            self.token = new_token;
            let _ = self.persist().await;
        }

        Ok(self.token.access_token.clone())
    }

    // 4 minute buffer so a token never expires mid-pagination
    fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp() as u64;
        now >= self.token.obtained_at + self.token.expires_in - 240
    }

    async fn refresh_token(&self) -> Result<Token, SyncError> {
        let client = Client::new();
        let res = client
            .post(config::SPOTIFY_TOKEN_URL)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", &self.token.refresh_token),
            ])
            .send()
            .await
            .map_err(SyncError::from)?;

        let res = res
            .error_for_status()
            .map_err(|e| SyncError::Auth(format!("token refresh rejected: {}", e)))?;

        let json: serde_json::Value = res.json().await.map_err(SyncError::from)?;
        let access_token = json["access_token"]
            .as_str()
            .ok_or_else(|| SyncError::Auth("token refresh response without access_token".into()))?
            .to_string();

        Ok(Token {
            access_token,
            // Spotify may rotate the refresh token; keep the old one otherwise
            refresh_token: json["refresh_token"]
                .as_str()
                .unwrap_or(&self.token.refresh_token)
                .to_string(),
            scope: json["scope"]
                .as_str()
                .unwrap_or(&self.token.scope)
                .to_string(),
            expires_in: json["expires_in"].as_i64().unwrap_or(3600) as u64,
            obtained_at: Utc::now().timestamp() as u64,
        })
    }

    fn token_path() -> PathBuf {
        let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("sposync/cache/token.json");
        path
    }
}
