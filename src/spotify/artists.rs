use crate::{
    config,
    management::TokenManager,
    spotify,
    types::{Artist, FollowedArtistsResponse, SyncError},
    utils::RetryPolicy,
};

/// Retrieves every artist the authenticated user follows.
///
/// The followed-artists endpoint uses cursor-based pagination; pages are
/// walked until the cursor runs out. Used to seed new-release discovery.
pub async fn get_followed_artists(
    token_mgr: &mut TokenManager,
    retry: &RetryPolicy,
) -> Result<Vec<Artist>, SyncError> {
    let limit = 50u64;
    let mut artists: Vec<Artist> = Vec::new();
    let mut after: Option<String> = None;

    loop {
        let mut api_url = format!(
            "{uri}/me/following?type=artist&limit={limit}",
            uri = config::SPOTIFY_API_URL,
            limit = limit
        );
        if let Some(after_val) = &after {
            api_url.push_str(&format!("&after={}", after_val));
        }

        let res: FollowedArtistsResponse = spotify::get_json(&api_url, token_mgr, retry).await?;

        let fetched = res.artists.items.len();
        artists.extend(res.artists.items);

        after = res.artists.cursors.and_then(|c| c.after);
        if after.is_none() {
            return Ok(artists);
        }
        if fetched == 0 {
            return Err(SyncError::DataIntegrity(
                "followed-artists listing advertised a cursor but returned no items".to_string(),
            ));
        }
    }
}
