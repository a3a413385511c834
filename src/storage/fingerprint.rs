//! Content fingerprint of the persisted document
//!
//! The fingerprint is a SHA-256 digest of the raw file bytes rendered as a
//! weak entity tag: `W/"<64 uppercase hex digits>"`. It changes if and only if
//! the persisted bytes change.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use sha2::{Digest, Sha256};

use super::errors::{StorageError, StorageResult};

/// Computes the fingerprint of an in-memory byte slice.
pub fn fingerprint_bytes(data: &[u8]) -> String {
    format_fingerprint(&Sha256::digest(data))
}

/// Computes the fingerprint of a file, reading it in chunks.
///
/// # Errors
///
/// Returns `BOOK_STORAGE_IO_FAILURE` if the file cannot be read.
pub fn fingerprint_file(path: &Path) -> StorageResult<String> {
    let file = File::open(path).map_err(|e| StorageError::io_failure_at_path(path, e))?;

    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = reader
            .read(&mut buffer)
            .map_err(|e| StorageError::io_failure_at_path(path, e))?;

        if bytes_read == 0 {
            break;
        }

        hasher.update(&buffer[..bytes_read]);
    }

    Ok(format_fingerprint(&hasher.finalize()))
}

fn format_fingerprint(digest: &[u8]) -> String {
    let hex: String = digest.iter().map(|b| format!("{:02X}", b)).collect();
    format!("W/\"{}\"", hex)
}
