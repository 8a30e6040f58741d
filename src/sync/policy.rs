use std::{cmp::Ordering, collections::HashSet};

use chrono::{DateTime, Duration, Utc};

use crate::{
    types::{Album, Track},
    utils,
};

/// Tracks added within the trailing window, newest first.
///
/// The window boundary is inclusive: a track added exactly `window_days`
/// ago is still in. Tracks with no added-timestamp cannot be classified and
/// are excluded rather than defaulted to recent.
pub fn recently_added(universe: &[Track], window_days: i64, now: DateTime<Utc>) -> Vec<String> {
    let cutoff = now - Duration::days(window_days);

    let mut recent: Vec<&Track> = universe
        .iter()
        .filter(|t| t.added_at.is_some_and(|added| added >= cutoff))
        .collect();

    recent.sort_by(|a, b| match b.added_at.cmp(&a.added_at) {
        Ordering::Equal => a.id.cmp(&b.id),
        other => other,
    });

    recent.into_iter().map(|t| t.id.clone()).collect()
}

/// The `n` most-played tracks among those the ranking source reported.
///
/// Tracks absent from the ranking source are excluded, not treated as zero.
/// Equal play counts are ordered by track id so membership never flaps
/// between runs.
pub fn top_played(universe: &[Track], n: usize) -> Vec<String> {
    let mut ranked = ranked_tracks(universe);
    ranked.sort_by(|a, b| match b.1.cmp(&a.1) {
        Ordering::Equal => a.0.cmp(&b.0),
        other => other,
    });
    ranked.truncate(n);
    ranked.into_iter().map(|(id, _)| id).collect()
}

/// The `n` least-played tracks among those the ranking source reported,
/// excluding anything already claimed by the top selection.
///
/// When the ranked universe is smaller than `2n` the two sets would
/// overlap; the top selection takes precedence and the bottom playlist
/// receives whatever lowest tracks remain. The sets are always disjoint.
pub fn bottom_played(universe: &[Track], n: usize, top: &[String]) -> Vec<String> {
    let claimed: HashSet<&String> = top.iter().collect();

    let mut ranked = ranked_tracks(universe);
    ranked.retain(|(id, _)| !claimed.contains(id));
    ranked.sort_by(|a, b| match a.1.cmp(&b.1) {
        Ordering::Equal => a.0.cmp(&b.0),
        other => other,
    });
    ranked.truncate(n);
    ranked.into_iter().map(|(id, _)| id).collect()
}

fn ranked_tracks(universe: &[Track]) -> Vec<(String, u64)> {
    universe
        .iter()
        .filter_map(|t| t.play_count.map(|count| (t.id.clone(), count)))
        .collect()
}

/// Releases dated on or after the cutoff, deduplicated by album id across
/// artists. Year- and month-precision dates count from the first day of
/// their period; unparseable dates are skipped.
pub fn new_release_albums(albums: Vec<Album>, cutoff: DateTime<Utc>) -> Vec<Album> {
    let mut fresh: Vec<Album> = albums
        .into_iter()
        .filter(|album| {
            utils::normalize_release_date(&album.release_date)
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|dt| dt.and_utc() >= cutoff)
                .unwrap_or(false)
        })
        .collect();

    let mut seen_ids = HashSet::new();
    fresh.retain(|album| seen_ids.insert(album.id.clone()));
    fresh
}
