//! Payload download and verification.
//!
//! This module fetches pinned installer scripts and writes them into a
//! per-run scratch directory once their digests check out.

pub mod download;
pub mod scratch;

pub use download::{sha256_hex, PayloadFetcher};
pub use scratch::scratch_dir;
