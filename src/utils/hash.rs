use anyhow::{Result, anyhow};
use memmap2::MmapOptions;
use std::fs::File;
use std::path::Path;
use xxhash_rust::xxh3::xxh3_64;

/// Threshold above which files are memory-mapped instead of read whole.
const MMAP_THRESHOLD: u64 = 1_048_576;

/// Length in hex characters of the content digest (64 bits).
pub const DIGEST_LEN: usize = 16;

/// Hashes a byte slice to the fixed-width lowercase hex digest.
///
/// xxHash3 truncated to 64 bits: enough collision resistance for change
/// detection, deliberately not a cryptographic commitment.
#[must_use]
pub fn hash_bytes(data: &[u8]) -> String {
    format!("{:016x}", xxh3_64(data))
}

/// Hashes the full content of a regular file.
///
/// # Errors
///
/// Returns an error if the path is missing, unreadable, or not a regular
/// file (directories and special files carry no verifiable content).
pub fn hash_file(path: &Path) -> Result<String> {
    let file = File::open(path)?;
    let metadata = file.metadata()?;

    if !metadata.is_file() {
        return Err(anyhow!("not a regular file: {}", path.display()));
    }

    if metadata.len() == 0 {
        return Ok(hash_bytes(b""));
    }

    if metadata.len() < MMAP_THRESHOLD {
        let content = std::fs::read(path)?;
        Ok(hash_bytes(&content))
    } else {
        let mmap = unsafe { MmapOptions::new().map(&file)? };
        Ok(hash_bytes(&mmap))
    }
}
