//! # Playlist Reconciliation Module
//!
//! Turns a selection policy plus the in-memory track universe into a
//! desired identifier list, computes the minimal add/remove diff against a
//! target playlist's current contents, and applies it in batches.
//!
//! The whole pipeline is deliberately two-phase: every desired set is
//! computed before the first write, so a failed computation aborts the run
//! with all playlists untouched. Applying the same diff twice in a row with
//! no underlying data change produces zero writes the second time.

pub mod policy;
pub mod reconcile;
