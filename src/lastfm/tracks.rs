use std::{collections::HashMap, time::Duration};

use reqwest::{Client, StatusCode};
use tokio::time::sleep;

use crate::{
    config::{self, Config},
    types::{RankingRecord, SyncError, TopTracksResponse, Track},
    utils::{self, RetryPolicy},
    warning,
};

/// Retrieves the user's per-track scrobble counts for the configured
/// accounting period, paging until the service reports the last page.
///
/// Requests run one at a time with an inter-request delay; the aggregate
/// listing carries no per-play timestamp, so `last_played` stays `None`.
pub async fn get_top_tracks(
    cfg: &Config,
    retry: &RetryPolicy,
) -> Result<Vec<RankingRecord>, SyncError> {
    let client = Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .unwrap_or_else(|_| Client::new());

    let mut records: Vec<RankingRecord> = Vec::new();
    let mut page: u32 = 1;

    loop {
        let url = format!(
            "{api}?method=user.gettoptracks&user={user}&api_key={key}&period={period}&format=json&limit=200&page={page}",
            api = config::LASTFM_API_URL,
            user = cfg.lastfm_username,
            key = cfg.lastfm_api_key,
            period = cfg.lastfm_period,
            page = page
        );

        let res: TopTracksResponse = get_json(&client, &url, retry).await?;

        let total_pages = res
            .toptracks
            .attr
            .total_pages
            .parse::<u32>()
            .map_err(|_| {
                SyncError::DataIntegrity(format!(
                    "scrobble listing reported a non-numeric page count '{}'",
                    res.toptracks.attr.total_pages
                ))
            })?;

        for track in res.toptracks.track {
            let play_count = track.playcount.parse::<u64>().map_err(|_| {
                SyncError::DataIntegrity(format!(
                    "scrobble record '{}' carries a non-numeric play count '{}'",
                    track.name, track.playcount
                ))
            })?;
            records.push(RankingRecord {
                artist: track.artist.name,
                name: track.name,
                play_count,
                last_played: None,
            });
        }

        if page >= total_pages {
            return Ok(records);
        }
        page += 1;
        sleep(cfg.lastfm_request_delay).await;
    }
}

/// Resolves scrobble records against the track universe and merges their
/// play counts in. Returns (matched, dropped) record counts; unmatched
/// records contribute nothing.
pub fn resolve_records(
    records: Vec<RankingRecord>,
    universe: &mut HashMap<String, Track>,
) -> (usize, usize) {
    let key_to_id: HashMap<String, String> = universe
        .values()
        .map(|t| (utils::match_key(&t.artist, &t.name), t.id.clone()))
        .collect();

    let mut matched = 0usize;
    let mut dropped = 0usize;

    for record in records {
        let key = utils::match_key(&record.artist, &record.name);
        match key_to_id.get(&key).and_then(|id| universe.get_mut(id)) {
            Some(track) => {
                // case variants of the same track collapse onto one key
                *track.play_count.get_or_insert(0) += record.play_count;
                matched += 1;
            }
            None => dropped += 1,
        }
    }

    (matched, dropped)
}

// Unauthenticated GET with the shared retry policy; rate-limit waits honor
// Retry-After without consuming the budget.
async fn get_json<T: serde::de::DeserializeOwned>(
    client: &Client,
    url: &str,
    retry: &RetryPolicy,
) -> Result<T, SyncError> {
    let mut attempt: u32 = 0;

    loop {
        let response = client.get(url).send().await;

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
