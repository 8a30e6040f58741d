use crate::{
    config,
    management::TokenManager,
    spotify,
    types::{Album, AlbumResponse, GetSeveralAlbumsResponse, SyncError},
    utils::RetryPolicy,
};

/// Batch size for the several-albums endpoint imposed by the upstream API.
pub const ALBUM_BATCH_SIZE: usize = 20;

/// Retrieves the most recent albums and singles for an artist.
///
/// A single page of 50 covers the new-release lookback comfortably; the
/// caller filters by release date afterwards.
pub async fn get_artist_releases(
    artist_id: &str,
    token_mgr: &mut TokenManager,
    retry: &RetryPolicy,
) -> Result<Vec<Album>, SyncError> {
    let api_url = format!(
        "{uri}/artists/{id}/albums?include_groups=album,single&limit=50",
        uri = config::SPOTIFY_API_URL,
        id = artist_id
    );

    let json: AlbumResponse = spotify::get_json(&api_url, token_mgr, retry).await?;
    Ok(json.items)
}

/// Retrieves detailed information, including track listings, for a batch of
/// albums in a single request. At most [`ALBUM_BATCH_SIZE`] albums per call.
pub async fn get_several_albums(
    albums: &[Album],
    token_mgr: &mut TokenManager,
    retry: &RetryPolicy,
) -> Result<GetSeveralAlbumsResponse, SyncError> {
    debug_assert!(albums.len() <= ALBUM_BATCH_SIZE);

    let album_ids = albums
        .iter()
        .map(|a| a.id.as_str())
        .collect::<Vec<_>>()
        .join(",");

    let api_url = format!(
        "{url}/albums?ids={album_ids}",
        url = config::SPOTIFY_API_URL,
        album_ids = album_ids
    );

    spotify::get_json(&api_url, token_mgr, retry).await
}
