//! Cache validators for snapshot files.

use sha2::{Digest, Sha256};

use super::FileCtx;
use crate::types::Revision;

/// Current unix time in seconds.
pub fn unix_now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Builds the etag of `filectx` as seen from a snapshot of `revision`.
///
/// The value combines the modification time (creation time when the file
/// never changed), the content length and a checksum of the path. Working
/// directory files can change at any moment, so `now` stands in for the
/// file dates there.
pub fn etag(revision: Revision, filectx: &dyn FileCtx, now: i64) -> String {
    let time = match revision {
        Revision::Default => filectx.mdate().unwrap_or_else(|| filectx.date()),
        Revision::WorkingDir => now,
    };
    format!(
        "vellum-{}-{}-{}",
        time,
        filectx.data().len(),
        path_checksum(filectx.path())
    )
}

/// First eight bytes of the SHA-256 of `path`, hex encoded.
pub fn path_checksum(path: &str) -> String {
    let digest = Sha256::digest(path.as_bytes());
    hex::encode(&digest[..8])
}
