use std::collections::HashMap;

use crate::{
    config,
    management::TokenManager,
    spotify,
    types::{PlaylistTrackItem, PlaylistTracksResponse, SyncError, Track},
    utils::{self, RetryPolicy},
};

/// Retrieves every track of a playlist, paging until exhaustion.
///
/// The upstream API paginates at 100 items; failing to retrieve all pages
/// is an error, never a partial success. A page that advertises a next page
/// while returning no items means the listing was truncated upstream and is
/// reported as a data-integrity failure.
pub async fn get_playlist_tracks(
    playlist_id: &str,
    token_mgr: &mut TokenManager,
    retry: &RetryPolicy,
) -> Result<Vec<PlaylistTrackItem>, SyncError> {
    paged_items(
        &format!(
            "{uri}/playlists/{id}/tracks",
            uri = config::SPOTIFY_API_URL,
            id = playlist_id
        ),
        100,
        token_mgr,
        retry,
    )
    .await
}

/// Retrieves the user's Liked Songs. Same contract as
/// [`get_playlist_tracks`], but the saved-tracks endpoint caps pages at 50.
pub async fn get_saved_tracks(
    token_mgr: &mut TokenManager,
    retry: &RetryPolicy,
) -> Result<Vec<PlaylistTrackItem>, SyncError> {
    paged_items(
        &format!("{uri}/me/tracks", uri = config::SPOTIFY_API_URL),
        50,
        token_mgr,
        retry,
    )
    .await
}

async fn paged_items(
    base_url: &str,
    limit: usize,
    token_mgr: &mut TokenManager,
    retry: &RetryPolicy,
) -> Result<Vec<PlaylistTrackItem>, SyncError> {
    let mut items: Vec<PlaylistTrackItem> = Vec::new();
    let mut offset = 0usize;
    let mut expected_total: Option<u64> = None;

    loop {
        let url = format!(
            "{base}?limit={limit}&offset={offset}",
            base = base_url,
            limit = limit,
            offset = offset
        );
        let page: PlaylistTracksResponse = spotify::get_json(&url, token_mgr, retry).await?;

        if expected_total.is_none() {
            expected_total = page.total;
        }

        let fetched = page.items.len();
        items.extend(page.items);

        if page.next.is_none() {
            break;
        }
        if fetched == 0 {
            return Err(SyncError::DataIntegrity(format!(
                "{} advertised another page at offset {} but returned no items",
                base_url, offset
            )));
        }
        offset += limit;
    }

    // A count mismatch means the listing changed or truncated mid-walk;
    // better to abort than to reconcile against a partial snapshot.
    if let Some(total) = expected_total {
        if items.len() as u64 != total {
            return Err(SyncError::DataIntegrity(format!(
                "{} reported {} tracks but pagination returned {}",
                base_url,
                total,
                items.len()
            )));
        }
    }

    Ok(items)
}

/// Merges raw page items into the track universe, keyed by track id.
///
/// Items without a track object or without an id (local files, tracks gone
/// from the catalog) are skipped. When the same id arrives from several
/// sources the newest added-timestamp wins.
pub fn merge_into_universe(items: Vec<PlaylistTrackItem>, universe: &mut HashMap<String, Track>) {
    for item in items {
        let Some(track) = item.track else {
            continue;
        };
        let Some(id) = track.id else {
            continue;
        };

        let added_at = item.added_at.as_deref().and_then(utils::parse_added_at);
        let artist = track
            .artists
            .first()
            .map(|a| a.name.clone())
            .unwrap_or_default();

        match universe.get_mut(&id) {
            Some(existing) => {
                if added_at > existing.added_at {
                    existing.added_at = added_at;
                }
            }
            None => {
                universe.insert(
                    id.clone(),
                    Track {
                        id,
                        uri: track.uri,
                        name: track.name,
                        artist,
                        added_at,
                        play_count: None,
                    },
                );
            }
        }
    }
}
