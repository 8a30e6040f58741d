use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// Error taxonomy for a sync run.
///
/// Every failure surfaces to the top-level invocation as one of these
/// variants; there is no in-run recovery beyond the bounded retries in
/// `utils::RetryPolicy`. The next scheduled run self-heals since each run
/// recomputes everything from scratch.
#[derive(Debug)]
pub enum SyncError {
    /// Expired or invalid credentials. Not retryable.
    Auth(String),
    /// Timeout, 5xx or rate-limit that survived the retry budget.
    Transient(String),
    /// Truncated pagination or a malformed payload. Aborts before any
    /// playlist mutation.
    DataIntegrity(String),
    /// A batched playlist write partially succeeded. Carries exactly which
    /// identifiers were and were not applied; there is no rollback.
    PartialWrite {
        playlist: String,
        applied: Vec<String>,
        failed: Vec<String>,
        source: String,
    },
}

impl std::fmt::Display for SyncError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncError::Auth(msg) => write!(f, "authentication error: {}", msg),
            SyncError::Transient(msg) => write!(f, "transient network error: {}", msg),
            SyncError::DataIntegrity(msg) => write!(f, "data integrity error: {}", msg),
            SyncError::PartialWrite {
                playlist,
                applied,
                failed,
                source,
            } => write!(
                f,
                "partial write to playlist '{}': {} applied {:?}, {} not applied {:?}: {}",
                playlist,
                applied.len(),
                applied,
                failed.len(),
                failed,
                source
            ),
        }
    }
}

impl std::error::Error for SyncError {}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            if status == reqwest::StatusCode::UNAUTHORIZED
                || status == reqwest::StatusCode::FORBIDDEN
            {
                return SyncError::Auth(err.to_string());
            }
            if crate::utils::RetryPolicy::is_retryable_status(status) {
                return SyncError::Transient(err.to_string());
            }
            // remaining 4xx: the request itself was wrong, retrying won't help
            return SyncError::DataIntegrity(err.to_string());
        }
        if err.is_decode() {
            return SyncError::DataIntegrity(err.to_string());
        }
        SyncError::Transient(err.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

#[derive(Debug, Clone)]
pub struct PkceToken {
    pub code_verifier: String,
    pub token: Option<Token>,
}

/// A track in the in-memory universe built once per run.
///
/// Identity is by `id`; duplicates across sources are merged by identifier,
/// never by title text. `play_count` is only populated from the ranking
/// source and stays `None` for tracks it never reported.
#[derive(Debug, Clone)]
pub struct Track {
    pub id: String,
    pub uri: String,
    pub name: String,
    pub artist: String,
    pub added_at: Option<DateTime<Utc>>,
    pub play_count: Option<u64>,
}

/// One scrobble-count record from the ranking service.
///
/// The service has no notion of a Spotify identifier; records are resolved
/// against the library snapshot by normalized (artist, title) key. Aggregate
/// listings carry no per-play timestamp, so `last_played` is usually `None`.
#[derive(Debug, Clone)]
pub struct RankingRecord {
    pub artist: String,
    pub name: String,
    pub play_count: u64,
    pub last_played: Option<DateTime<Utc>>,
}

#[derive(Tabled)]
pub struct SyncTableRow {
    pub playlist: String,
    pub desired: usize,
    pub added: usize,
    pub removed: usize,
}

// --- Spotify wire types ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowedArtistsResponse {
    pub artists: ArtistsContainer,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistsContainer {
    pub items: Vec<Artist>,
    pub next: Option<String>,
    pub cursors: Option<Cursors>,
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cursors {
    pub after: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackArtist {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackObject {
    pub id: Option<String>,
    pub uri: String,
    pub name: String,
    pub artists: Vec<TrackArtist>,
}

/// One entry of a playlist-tracks or saved-tracks page. `track` is null for
/// tracks removed from the catalog, `track.id` is null for local files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistTrackItem {
    pub added_at: Option<String>,
    pub track: Option<TrackObject>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistTracksResponse {
    pub items: Vec<PlaylistTrackItem>,
    pub next: Option<String>,
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumResponse {
    pub items: Vec<Album>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Album {
    pub id: String,
    pub name: String,
    pub release_date: String,
    pub release_date_precision: String,
    pub artists: Vec<AlbumArtist>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumArtist {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetSeveralAlbumsResponse {
    pub albums: Vec<GetAlbumResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetAlbumResponse {
    pub id: String,
    pub name: String,
    pub release_date: String,
    pub tracks: AlbumTracks,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumTracks {
    pub items: Vec<AlbumTrack>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumTrack {
    pub id: Option<String>,
    pub uri: String,
    pub name: String,
    pub artists: Vec<TrackArtist>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
    pub collaborative: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistResponse {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTracksRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveTracksRequest {
    pub tracks: Vec<TrackUri>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackUri {
    pub uri: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotResponse {
    pub snapshot_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetUserPlaylistsResponse {
    pub items: Vec<Playlist>,
    pub next: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUserResponse {
    pub id: String,
}

// --- Last.fm wire types ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopTracksResponse {
    pub toptracks: TopTracksContainer,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopTracksContainer {
    pub track: Vec<TopTrack>,
    #[serde(rename = "@attr")]
    pub attr: TopTracksAttr,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopTrack {
    pub name: String,
    pub playcount: String,
    pub artist: TopTrackArtist,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopTrackArtist {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopTracksAttr {
    pub page: String,
    #[serde(rename = "totalPages")]
    pub total_pages: String,
}
