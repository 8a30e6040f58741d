use std::{
    collections::{HashMap, HashSet},
    time::Duration,
};

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use indicatif::{ProgressBar, ProgressStyle};
use tabled::Table;

use crate::{
    config::Config,
    error, info, lastfm,
    management::TokenManager,
    spotify::{artists, library, playlist, releases},
    success,
    sync::{policy, reconcile},
    types::{SyncError, SyncTableRow, Track},
    utils::RetryPolicy,
};

/// Restricts a run to one family of managed playlists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SyncScope {
    /// The recently-added playlist only
    Recent,
    /// The top/bottom play-count playlists only
    Playcount,
    /// The new-releases playlist only
    Releases,
}

struct PlaylistPlan {
    name: String,
    // None when the playlist does not exist yet; created right before apply
    playlist_id: Option<String>,
    add_uris: Vec<String>,
    remove_uris: Vec<String>,
}

pub async fn sync(cfg: &Config, only: Option<SyncScope>, dry_run: bool) {
    if let Err(e) = run(cfg, only, dry_run).await {
        error!("Sync failed: {}", e);
    }
}

/// One full reconciliation run.
///
/// Phase 1 builds the track universe and computes every desired set; phase
/// 2 applies the diffs. Any phase-1 failure returns before a single write,
/// so no playlist is ever reconciled against an incomplete universe.
async fn run(cfg: &Config, only: Option<SyncScope>, dry_run: bool) -> Result<(), SyncError> {
    let in_scope = |s: SyncScope| only.is_none() || only == Some(s);
    let retry = RetryPolicy::default();
    let now = Utc::now();

    let mut token_mgr = TokenManager::load(cfg).await?;

    // --- phase 1: read everything, compute everything ---

    let mut universe = build_universe(cfg, &mut token_mgr, &retry).await?;
    info!("Track universe: {} tracks", universe.len());

    if in_scope(SyncScope::Playcount) {
        info!(
            "Fetching scrobble counts for {} ({})...",
            cfg.lastfm_username, cfg.lastfm_period
        );
        let records = lastfm::get_top_tracks(cfg, &retry).await?;
        let (matched, dropped) = lastfm::resolve_records(records, &mut universe);
        info!(
            "Matched {} scrobble records against the library ({} unmatched dropped)",
            matched, dropped
        );
    }

    let mut uri_index: HashMap<String, String> = universe
        .values()
        .map(|t| (t.id.clone(), t.uri.clone()))
        .collect();

    let tracks: Vec<Track> = universe.values().cloned().collect();
    let mut desired_sets: Vec<(String, Vec<String>)> = Vec::new();

    if in_scope(SyncScope::Recent) {
        desired_sets.push((
            cfg.target_playlist_name.clone(),
            policy::recently_added(&tracks, cfg.recency_window_days, now),
        ));
    }

    if in_scope(SyncScope::Playcount) {
        let top = policy::top_played(&tracks, cfg.playcount_playlist_size);
        let bottom = policy::bottom_played(&tracks, cfg.playcount_playlist_size, &top);
        desired_sets.push((cfg.top_playlist_name.clone(), top));
        desired_sets.push((cfg.bottom_playlist_name.clone(), bottom));
    }

    if in_scope(SyncScope::Releases) {
        let desired =
            new_release_desired(cfg, &mut token_mgr, &retry, &universe, &mut uri_index, now)
                .await?;
        desired_sets.push((cfg.new_releases_playlist_name.clone(), desired));
    }

    let mut plans: Vec<PlaylistPlan> = Vec::new();
    let mut rows: Vec<SyncTableRow> = Vec::new();

    for (name, desired) in desired_sets {
        let existing = playlist::find_by_name(&name, &mut token_mgr, &retry).await?;

        let (playlist_id, current) = match &existing {
            Some(p) => {
                let items = library::get_playlist_tracks(&p.id, &mut token_mgr, &retry).await?;
                let mut current: Vec<String> = Vec::new();
                for item in items {
                    let Some(track) = item.track else { continue };
                    let Some(id) = track.id else { continue };
                    uri_index.insert(id.clone(), track.uri);
                    current.push(id);
                }
                (Some(p.id.clone()), current)
            }
            None => (None, Vec::new()),
        };

        let diff = reconcile::diff(&desired, &current);
        let add_uris = ids_to_uris(&diff.to_add, &uri_index)?;
        let remove_uris = ids_to_uris(&diff.to_remove, &uri_index)?;

        rows.push(SyncTableRow {
            playlist: name.clone(),
            desired: desired.len(),
            added: diff.to_add.len(),
            removed: diff.to_remove.len(),
        });
        plans.push(PlaylistPlan {
            name,
            playlist_id,
            add_uris,
            remove_uris,
        });
    }

    if dry_run {
        println!("{}", Table::new(&rows));
        info!("Dry run, no writes applied.");
        return Ok(());
    }

    // --- phase 2: apply ---

    for plan in plans {
        if plan.add_uris.is_empty() && plan.remove_uris.is_empty() {
            info!("Playlist '{}' already in sync", plan.name);
            continue;
        }

        let playlist_id = match plan.playlist_id {
            Some(id) => id,
            None => {
                info!("Creating playlist '{}'", plan.name);
                playlist::create(&plan.name, &mut token_mgr, &retry).await?.id
            }
        };

        reconcile::apply(
            &plan.name,
            &playlist_id,
            &plan.remove_uris,
            &plan.add_uris,
            &mut token_mgr,
        )
        .await?;

        success!(
            "Reconciled '{}' (+{} / -{})",
            plan.name,
            plan.add_uris.len(),
            plan.remove_uris.len()
        );
    }

    println!("{}", Table::new(&rows));
    success!("All playlists reconciled.");
    Ok(())
}

/// Builds the track universe from the source playlist(s) and Liked Songs.
async fn build_universe(
    cfg: &Config,
    token_mgr: &mut TokenManager,
    retry: &RetryPolicy,
) -> Result<HashMap<String, Track>, SyncError> {
    let pb = spinner("Fetching source playlist tracks...");
    let mut universe: HashMap<String, Track> = HashMap::new();

    for playlist_id in &cfg.source_playlist_ids {
        pb.set_message(format!("Fetching tracks from playlist {}...", playlist_id));
        let items = library::get_playlist_tracks(playlist_id, token_mgr, retry)
            .await
            .map_err(|e| {
                pb.finish_and_clear();
                e
            })?;
        library::merge_into_universe(items, &mut universe);
    }

    pb.set_message("Fetching Liked Songs...");
    let items = library::get_saved_tracks(token_mgr, retry)
        .await
        .map_err(|e| {
            pb.finish_and_clear();
            e
        })?;
    library::merge_into_universe(items, &mut universe);

    pb.finish_and_clear();
    Ok(universe)
}

/// Computes the desired id list for the new-releases playlist: every track
/// of every release dated within the lookback, minus tracks the library
/// already has, deduplicated across releases.
async fn new_release_desired(
    cfg: &Config,
    token_mgr: &mut TokenManager,
    retry: &RetryPolicy,
    universe: &HashMap<String, Track>,
    uri_index: &mut HashMap<String, String>,
    now: DateTime<Utc>,
) -> Result<Vec<String>, SyncError> {
    let cutoff = now - chrono::Duration::hours(cfg.new_releases_lookback_hours);

    let pb = spinner("Fetching followed artists...");
    let followed = artists::get_followed_artists(token_mgr, retry)
        .await
        .map_err(|e| {
            pb.finish_and_clear();
            e
        })?;

    let mut albums = Vec::new();
    for (i, artist) in followed.iter().enumerate() {
        pb.set_message(format!(
            "[{}/{}] Checking releases for {}...",
            i + 1,
            followed.len(),
            artist.name
        ));
        let artist_albums = releases::get_artist_releases(&artist.id, token_mgr, retry)
            .await
            .map_err(|e| {
                pb.finish_and_clear();
                e
            })?;
        albums.extend(artist_albums);
    }

    let fresh = policy::new_release_albums(albums, cutoff);
    pb.set_message(format!(
        "Fetching track listings for {} new releases...",
        fresh.len()
    ));

    let mut desired: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for chunk in fresh.chunks(releases::ALBUM_BATCH_SIZE) {
        let details = releases::get_several_albums(chunk, token_mgr, retry)
            .await
            .map_err(|e| {
                pb.finish_and_clear();
                e
            })?;
        for album in details.albums {
            for track in album.tracks.items {
                let Some(id) = track.id else { continue };
                // the user already has this one
                if universe.contains_key(&id) {
                    continue;
                }
                if !seen.insert(id.clone()) {
                    continue;
                }
                uri_index.insert(id.clone(), track.uri);
                desired.push(id);
            }
        }
    }

    pb.finish_and_clear();
    info!(
        "Found {} new releases with {} tracks to add",
        fresh.len(),
        desired.len()
    );
    Ok(desired)
}

fn ids_to_uris(
    ids: &[String],
    uri_index: &HashMap<String, String>,
) -> Result<Vec<String>, SyncError> {
    ids.iter()
        .map(|id| {
            uri_index.get(id).cloned().ok_or_else(|| {
                SyncError::DataIntegrity(format!("no URI known for track id {}", id))
            })
        })
        .collect()
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}
