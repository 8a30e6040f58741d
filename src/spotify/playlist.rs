use reqwest::StatusCode;

use crate::{
    config,
    management::TokenManager,
    spotify,
    types::{
        AddTracksRequest, CreatePlaylistRequest, CreatePlaylistResponse, CurrentUserResponse,
        GetUserPlaylistsResponse, Playlist, RemoveTracksRequest, SnapshotResponse, SyncError,
        TrackUri,
    },
    utils::RetryPolicy,
};

/// Batch size for playlist track writes imposed by the upstream API.
pub const WRITE_BATCH_SIZE: usize = 100;

/// Looks a playlist up by name among the current user's playlists.
///
/// The listing is paginated; the whole list is walked so a playlist far
/// down a large collection is still found. Names are compared exactly.
pub async fn find_by_name(
    name: &str,
    token_mgr: &mut TokenManager,
    retry: &RetryPolicy,
) -> Result<Option<Playlist>, SyncError> {
    let limit = 50usize;
    let mut offset = 0usize;

    loop {
        let url = format!(
            "{uri}/me/playlists?limit={limit}&offset={offset}",
            uri = config::SPOTIFY_API_URL,
            limit = limit,
            offset = offset
        );
        let page: GetUserPlaylistsResponse = spotify::get_json(&url, token_mgr, retry).await?;

        if let Some(playlist) = page.items.iter().find(|p| p.name == name) {
            return Ok(Some(playlist.clone()));
        }
        if page.next.is_none() {
            return Ok(None);
        }
        offset += limit;
    }
}

/// Creates a private playlist owned by the current user.
pub async fn create(
    name: &str,
    token_mgr: &mut TokenManager,
    retry: &RetryPolicy,
) -> Result<CreatePlaylistResponse, SyncError> {
    let me_url = format!("{uri}/me", uri = config::SPOTIFY_API_URL);
    let me: CurrentUserResponse = spotify::get_json(&me_url, token_mgr, retry).await?;

    let url = format!(
        "{uri}/users/{user}/playlists",
        uri = config::SPOTIFY_API_URL,
        user = me.id
    );
    let body = CreatePlaylistRequest {
        name: name.to_string(),
        description: "Managed by sposync".to_string(),
        public: false,
        collaborative: false,
    };

    let token = token_mgr.get_valid_token().await?;
    let response = spotify::http_client()
        .post(&url)
        .bearer_auth(&token)
        .json(&body)
        .send()
        .await
        .map_err(SyncError::from)?
        .error_for_status()
        .map_err(SyncError::from)?;

    response
        .json::<CreatePlaylistResponse>()
        .await
        .map_err(SyncError::from)
}

/// Adds up to [`WRITE_BATCH_SIZE`] track URIs to a playlist.
///
/// Writes are single-attempt: an ambiguous failure must be reported, not
/// repeated, so the caller can say exactly which identifiers were applied.
pub async fn add_tracks(
    playlist_id: &str,
    uris: &[String],
    token_mgr: &mut TokenManager,
) -> Result<SnapshotResponse, SyncError> {
    debug_assert!(uris.len() <= WRITE_BATCH_SIZE);

    let url = format!(
        "{uri}/playlists/{id}/tracks",
        uri = config::SPOTIFY_API_URL,
        id = playlist_id
    );
    let body = AddTracksRequest {
        uris: uris.to_vec(),
    };

    let token = token_mgr.get_valid_token().await?;
    let response = spotify::http_client()
        .post(&url)
        .bearer_auth(&token)
        .json(&body)
        .send()
        .await
        .map_err(SyncError::from)?;

    classify_write_status(response.status())?;
    response
        .json::<SnapshotResponse>()
        .await
        .map_err(SyncError::from)
}

/// Removes up to [`WRITE_BATCH_SIZE`] track URIs from a playlist.
pub async fn remove_tracks(
    playlist_id: &str,
    uris: &[String],
    token_mgr: &mut TokenManager,
) -> Result<SnapshotResponse, SyncError> {
    debug_assert!(uris.len() <= WRITE_BATCH_SIZE);

    let url = format!(
        "{uri}/playlists/{id}/tracks",
        uri = config::SPOTIFY_API_URL,
        id = playlist_id
    );
    let body = RemoveTracksRequest {
        tracks: uris
            .iter()
            .map(|u| TrackUri { uri: u.clone() })
            .collect(),
    };

    let token = token_mgr.get_valid_token().await?;
    let response = spotify::http_client()
        .delete(&url)
        .bearer_auth(&token)
        .json(&body)
        .send()
        .await
        .map_err(SyncError::from)?;

    classify_write_status(response.status())?;
    response
        .json::<SnapshotResponse>()
        .await
        .map_err(SyncError::from)
}

fn classify_write_status(status: StatusCode) -> Result<(), SyncError> {
    if status.is_success() {
        return Ok(());
    }
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(SyncError::Auth(format!("playlist write rejected: {}", status)));
    }
    Err(SyncError::Transient(format!(
        "playlist write failed: {}",
        status
    )))
}
