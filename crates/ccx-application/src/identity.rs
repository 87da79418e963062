//! Deterministic chunk identity
//!
//! A chunk's id is a pure function of `(relative_path, start_line,
//! end_line, content)`, so re-indexing identical content upserts onto the
//! same documents regardless of process or run. Stores that require UUID
//! ids get one derived from the md5 digest instead of a random one, for the
//! same reason.

use ccx_domain::constants::CHUNK_ID_HASH_LEN;
use ccx_domain::ports::vector_store::ChunkIdKind;
use sha2::{Digest, Sha256};

/// Compute the deterministic id for a chunk in the format `kind` requires
pub fn chunk_id(
    kind: ChunkIdKind,
    relative_path: &str,
    start_line: u32,
    end_line: u32,
    content: &str,
) -> String {
    let combined = format!("{relative_path}:{start_line}:{end_line}:{content}");
    match kind {
        ChunkIdKind::Opaque => {
            let mut hasher = Sha256::new();
            hasher.update(combined.as_bytes());
            let digest = format!("{:x}", hasher.finalize());
            format!("chunk_{}", &digest[..CHUNK_ID_HASH_LEN])
        }
        ChunkIdKind::Uuid => {
            let digest = md5::compute(combined.as_bytes());
            uuid::Uuid::from_bytes(digest.0).to_string()
        }
    }
}
