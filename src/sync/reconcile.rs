use std::collections::HashSet;

use crate::{
    management::TokenManager,
    spotify::playlist::{self, WRITE_BATCH_SIZE},
    types::SyncError,
};

/// The minimal set of writes that turns `current` into `desired`.
#[derive(Debug, Clone, PartialEq)]
pub struct Diff {
    pub to_add: Vec<String>,
    pub to_remove: Vec<String>,
}

impl Diff {
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// Computes `desired − current` and `current − desired` as identifier
/// lists. Additions keep the desired order, removals the current order;
/// identical sets yield an empty diff, which is what makes reconciliation
/// idempotent.
pub fn diff(desired: &[String], current: &[String]) -> Diff {
    let desired_set: HashSet<&String> = desired.iter().collect();
    let current_set: HashSet<&String> = current.iter().collect();

    Diff {
        to_add: desired
            .iter()
            .filter(|id| !current_set.contains(*id))
            .cloned()
            .collect(),
        to_remove: current
            .iter()
            .filter(|id| !desired_set.contains(*id))
            .cloned()
            .collect(),
    }
}

/// Applies a diff to a playlist, removals before additions.
///
/// Removals go first so a service enforcing a playlist size cap never sees
/// a transient overshoot. Writes are batched at the upstream per-call item
/// limit. A failed batch stops the apply immediately and reports exactly
/// which URIs were and were not written; there is no rollback, the next
/// run's recomputation converges on the correct state.
pub async fn apply(
    playlist_name: &str,
    playlist_id: &str,
    remove_uris: &[String],
    add_uris: &[String],
    token_mgr: &mut TokenManager,
) -> Result<(), SyncError> {
    let mut applied: Vec<String> = Vec::new();

    for (chunk_index, chunk) in remove_uris.chunks(WRITE_BATCH_SIZE).enumerate() {
        if let Err(e) = playlist::remove_tracks(playlist_id, chunk, token_mgr).await {
            let mut failed: Vec<String> =
                remove_uris[chunk_index * WRITE_BATCH_SIZE..].to_vec();
            failed.extend_from_slice(add_uris);
            return Err(partial_write(playlist_name, applied, failed, e));
        }
        applied.extend_from_slice(chunk);
    }

    for (chunk_index, chunk) in add_uris.chunks(WRITE_BATCH_SIZE).enumerate() {
        if let Err(e) = playlist::add_tracks(playlist_id, chunk, token_mgr).await {
            let failed: Vec<String> = add_uris[chunk_index * WRITE_BATCH_SIZE..].to_vec();
            return Err(partial_write(playlist_name, applied, failed, e));
        }
        applied.extend_from_slice(chunk);
    }

    Ok(())
}

fn partial_write(
    playlist_name: &str,
    applied: Vec<String>,
    failed: Vec<String>,
    source: SyncError,
) -> SyncError {
    SyncError::PartialWrite {
        playlist: playlist_name.to_string(),
        applied,
        failed,
        source: source.to_string(),
    }
}
