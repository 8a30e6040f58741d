use chrono::{DateTime, Duration, TimeZone, Utc};
use sposync::sync::policy::*;
use sposync::types::{Album, AlbumArtist, Track};

// Helper function to create a test track
fn create_test_track(id: &str, added_at: Option<DateTime<Utc>>, play_count: Option<u64>) -> Track {
    Track {
        id: id.to_string(),
        uri: format!("spotify:track:{}", id),
        name: format!("Track {}", id),
        artist: format!("Artist {}", id),
        added_at,
        play_count,
    }
}

// Helper function to create a test album
fn create_test_album(id: &str, release_date: &str) -> Album {
    Album {
        id: id.to_string(),
        name: format!("Album {}", id),
        release_date: release_date.to_string(),
        release_date_precision: "day".to_string(),
        artists: vec![AlbumArtist {
            id: format!("{}_artist_id", id),
            name: "Artist".to_string(),
        }],
    }
}

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap()
}

#[test]
fn test_recently_added_window_boundary_is_inclusive() {
    let now = fixed_now();
    let cutoff = now - Duration::days(30);

    let universe = vec![
        create_test_track("on_boundary", Some(cutoff), None),
        create_test_track("just_outside", Some(cutoff - Duration::milliseconds(1)), None),
    ];

    let selected = recently_added(&universe, 30, now);

    // Exactly at the boundary is in, one millisecond older is out
    assert_eq!(selected, vec!["on_boundary".to_string()]);
}

#[test]
fn test_recently_added_excludes_null_timestamps() {
    let now = fixed_now();
    let universe = vec![
        create_test_track("dated", Some(now - Duration::days(1)), None),
        create_test_track("undated", None, None),
    ];

    let selected = recently_added(&universe, 30, now);

    // A track that cannot be classified must not default to "recent"
    assert_eq!(selected, vec!["dated".to_string()]);
}

#[test]
fn test_recently_added_orders_newest_first() {
    let now = fixed_now();
    let universe = vec![
        create_test_track("t40", Some(now - Duration::days(40)), None),
        create_test_track("t10", Some(now - Duration::days(10)), None),
        create_test_track("t1", Some(now - Duration::days(1)), None),
    ];

    let selected = recently_added(&universe, 30, now);

    // 40-day-old track falls outside the 30-day window
    assert_eq!(selected, vec!["t1".to_string(), "t10".to_string()]);
}

#[test]
fn test_top_played_excludes_unranked_tracks() {
    let universe = vec![
        create_test_track("ranked", None, Some(5)),
        create_test_track("unranked", None, None),
    ];

    let selected = top_played(&universe, 10);

    // Absent from the ranking source means excluded, not zero plays
    assert_eq!(selected, vec!["ranked".to_string()]);
}

#[test]
fn test_top_played_tie_break_is_deterministic() {
    let universe = vec![
        create_test_track("b", None, Some(7)),
        create_test_track("a", None, Some(7)),
        create_test_track("c", None, Some(9)),
    ];

    let first = top_played(&universe, 3);
    let second = top_played(&universe, 3);

    // Equal play counts fall back to identifier order
    assert_eq!(first, vec!["c".to_string(), "a".to_string(), "b".to_string()]);
    assert_eq!(first, second);
}

#[test]
fn test_bottom_played_sorts_ascending_with_tie_break() {
    let universe = vec![
        create_test_track("b", None, Some(3)),
        create_test_track("a", None, Some(3)),
        create_test_track("c", None, Some(1)),
        create_test_track("d", None, None),
    ];

    let selected = bottom_played(&universe, 3, &[]);

    assert_eq!(
        selected,
        vec!["c".to_string(), "a".to_string(), "b".to_string()]
    );
}

#[test]
fn test_top_and_bottom_are_disjoint_in_the_overlap_zone() {
    // 30 ranked tracks, N = 25: the selections would overlap, so the top
    // selection takes precedence and bottom gets the remaining 5 lowest.
    let universe: Vec<Track> = (0..30)
        .map(|i| create_test_track(&format!("t{:02}", i), None, Some(i as u64)))
        .collect();

    let top = top_played(&universe, 25);
    let bottom = bottom_played(&universe, 25, &top);

    assert_eq!(top.len(), 25);
    assert_eq!(bottom.len(), 5);

    for id in &bottom {
        assert!(!top.contains(id), "{} appears in both selections", id);
    }

    // Together they cover all 30 identifiers exactly once apiece
    let mut all: Vec<String> = top.iter().chain(bottom.iter()).cloned().collect();
    all.sort();
    all.dedup();
    assert_eq!(all.len(), 30);

    // The 5 least-played tracks are the bottom ones
    let mut bottom_sorted = bottom.clone();
    bottom_sorted.sort();
    assert_eq!(
        bottom_sorted,
        vec!["t00", "t01", "t02", "t03", "t04"]
            .into_iter()
            .map(String::from)
            .collect::<Vec<_>>()
    );
}

#[test]
fn test_new_release_albums_normalizes_coarse_dates() {
    let cutoff = Utc.with_ymd_and_hms(2026, 7, 1, 0, 0, 0).unwrap();

    let albums = vec![
        create_test_album("year_only", "2026"),       // counts as 2026-01-01
        create_test_album("month_only", "2026-07"),   // counts as 2026-07-01
        create_test_album("full_date", "2026-07-15"),
        create_test_album("too_old", "2026-06-30"),
        create_test_album("unparseable", "someday"),
    ];

    let fresh = new_release_albums(albums, cutoff);
    let ids: Vec<&str> = fresh.iter().map(|a| a.id.as_str()).collect();

    // Cutoff is inclusive; coarse dates count from the start of their period
    assert_eq!(ids, vec!["month_only", "full_date"]);
}

#[test]
fn test_new_release_albums_dedups_by_album_id() {
    let cutoff = Utc.with_ymd_and_hms(2026, 7, 1, 0, 0, 0).unwrap();

    // The same release reached through two followed artists
    let albums = vec![
        create_test_album("shared", "2026-07-10"),
        create_test_album("shared", "2026-07-10"),
        create_test_album("solo", "2026-07-11"),
    ];

    let fresh = new_release_albums(albums, cutoff);
    assert_eq!(fresh.len(), 2);
    assert_eq!(fresh[0].id, "shared");
    assert_eq!(fresh[1].id, "solo");
}
