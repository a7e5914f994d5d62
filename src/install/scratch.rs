//! Scratch directory for downloaded installer payloads.
//!
//! Each run writes its payloads under a fresh timestamped directory in
//! the system temp location. Nothing ever deletes it: after a failed
//! install the exact script bytes are still on disk for inspection.

use std::path::PathBuf;

use chrono::Utc;

/// Compute the scratch directory path for this run.
///
/// The name embeds a UTC timestamp so successive runs never collide and
/// so a directory can be matched to a run when debugging.
pub fn scratch_dir() -> PathBuf {
    let stamp = Utc::now().format("%Y%m%d-%H%M%S");
    std::env::temp_dir().join(format!("cairn-{stamp}"))
}
