use std::collections::HashMap;

use sposync::lastfm::resolve_records;
use sposync::spotify::library::merge_into_universe;
use sposync::types::{PlaylistTrackItem, RankingRecord, Track, TrackArtist, TrackObject};

fn library_track(id: &str, artist: &str, name: &str) -> Track {
    Track {
        id: id.to_string(),
        uri: format!("spotify:track:{}", id),
        name: name.to_string(),
        artist: artist.to_string(),
        added_at: None,
        play_count: None,
    }
}

fn record(artist: &str, name: &str, play_count: u64) -> RankingRecord {
    RankingRecord {
        artist: artist.to_string(),
        name: name.to_string(),
        play_count,
        last_played: None,
    }
}

fn page_item(id: Option<&str>, name: &str, artist: &str, added_at: Option<&str>) -> PlaylistTrackItem {
    PlaylistTrackItem {
        added_at: added_at.map(|s| s.to_string()),
        track: Some(TrackObject {
            id: id.map(|s| s.to_string()),
            uri: id
                .map(|s| format!("spotify:track:{}", s))
                .unwrap_or_else(|| "spotify:local:whatever".to_string()),
            name: name.to_string(),
            artists: vec![TrackArtist {
                name: artist.to_string(),
            }],
        }),
    }
}

#[test]
fn test_resolve_records_matches_case_insensitively() {
    let mut universe = HashMap::new();
    universe.insert(
        "1".to_string(),
        library_track("1", "Radiohead", "Paranoid Android"),
    );

    let records = vec![record("  RADIOHEAD ", "paranoid android", 42)];
    let (matched, dropped) = resolve_records(records, &mut universe);

    assert_eq!(matched, 1);
    assert_eq!(dropped, 0);
    assert_eq!(universe["1"].play_count, Some(42));
}

#[test]
fn test_resolve_records_drops_unmatched_records() {
    let mut universe = HashMap::new();
    universe.insert(
        "1".to_string(),
        library_track("1", "Radiohead", "Paranoid Android"),
    );

    let records = vec![record("Someone Else", "Another Song", 99)];
    let (matched, dropped) = resolve_records(records, &mut universe);

    // Unmatched records are never invented as new tracks
    assert_eq!(matched, 0);
    assert_eq!(dropped, 1);
    assert_eq!(universe.len(), 1);
    assert_eq!(universe["1"].play_count, None);
}

#[test]
fn test_resolve_records_sums_case_variants_of_the_same_track() {
    let mut universe = HashMap::new();
    universe.insert("1".to_string(), library_track("1", "Burial", "Archangel"));

    let records = vec![record("Burial", "Archangel", 10), record("burial", "archangel", 5)];
    let (matched, dropped) = resolve_records(records, &mut universe);

    assert_eq!(matched, 2);
    assert_eq!(dropped, 0);
    assert_eq!(universe["1"].play_count, Some(15));
}

#[test]
fn test_merge_into_universe_skips_null_tracks_and_ids() {
    let mut universe = HashMap::new();

    let items = vec![
        PlaylistTrackItem {
            added_at: Some("2026-01-28T13:00:00Z".to_string()),
            track: None,
        },
        page_item(None, "Local File", "Somebody", Some("2026-01-28T13:00:00Z")),
        page_item(Some("1"), "Kept", "Somebody", Some("2026-01-28T13:00:00Z")),
    ];

    merge_into_universe(items, &mut universe);

    assert_eq!(universe.len(), 1);
    assert!(universe.contains_key("1"));
}

#[test]
fn test_merge_into_universe_keeps_newest_added_timestamp() {
    let mut universe = HashMap::new();

    // Same track arrives from two sources with different timestamps
    merge_into_universe(
        vec![page_item(Some("1"), "Song", "Artist", Some("2026-01-10T00:00:00Z"))],
        &mut universe,
    );
    merge_into_universe(
        vec![page_item(Some("1"), "Song", "Artist", Some("2026-01-15T00:00:00Z"))],
        &mut universe,
    );
    merge_into_universe(
        vec![page_item(Some("1"), "Song", "Artist", Some("2026-01-12T00:00:00Z"))],
        &mut universe,
    );

    assert_eq!(universe.len(), 1);
    let added = universe["1"].added_at.expect("timestamp should be set");
    assert_eq!(added.to_rfc3339(), "2026-01-15T00:00:00+00:00");
}

#[test]
fn test_merge_into_universe_upgrades_missing_timestamp() {
    let mut universe = HashMap::new();

    merge_into_universe(
        vec![page_item(Some("1"), "Song", "Artist", None)],
        &mut universe,
    );
    assert_eq!(universe["1"].added_at, None);

    merge_into_universe(
        vec![page_item(Some("1"), "Song", "Artist", Some("2026-01-15T00:00:00Z"))],
        &mut universe,
    );
    assert!(universe["1"].added_at.is_some());
}
