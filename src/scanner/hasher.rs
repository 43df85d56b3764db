//! BLAKE3 file hasher with streaming support.
//!
//! Computes content digests by reading the whole file through a
//! fixed-size buffer. A read of zero bytes is the only end-of-file
//! signal honored; interrupted reads are retried.

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use super::HashError;

/// Content digest of a file (BLAKE3, 32 bytes).
pub type FileDigest = [u8; 32];

/// Default size of the read buffer, in bytes.
pub const READ_BUF_SIZE: usize = 1024 * 1024;

/// Streaming file hasher with a reusable read buffer.
///
/// Each consumer worker owns its own `Hasher`, so the buffer is never
/// shared across threads.
pub struct Hasher {
    buf: Vec<u8>,
}

impl Hasher {
    /// Create a hasher with the default buffer size.
    #[must_use]
    pub fn new() -> Self {
        Self::with_buffer_size(READ_BUF_SIZE)
    }

    /// Create a hasher with a custom buffer size (must be non-zero).
    #[must_use]
    pub fn with_buffer_size(size: usize) -> Self {
        Self {
            buf: vec![0u8; size.max(1)],
        }
    }

    /// Digest the full content of the file at `path`.
    ///
    /// The file is consumed exactly once, reading to end-of-stream in
    /// buffer-sized chunks.
    pub fn digest_file(&mut self, path: &Path) -> Result<FileDigest, HashError> {
        let mut file = File::open(path).map_err(|e| Self::open_error(path, e))?;
        let mut hasher = blake3::Hasher::new();

        loop {
            let read = match file.read(&mut self.buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    return Err(HashError::Io {
                        path: path.to_path_buf(),
                        source: e,
                    })
                }
            };
            hasher.update(&self.buf[..read]);
        }

        Ok(hasher.finalize().into())
    }

    fn open_error(path: &Path, error: std::io::Error) -> HashError {
        match error.kind() {
            ErrorKind::NotFound => HashError::NotFound(path.to_path_buf()),
            ErrorKind::PermissionDenied => HashError::PermissionDenied(path.to_path_buf()),
            _ => HashError::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_identical_content_same_digest() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.bin");
        let b = dir.path().join("b.bin");
        fs::write(&a, b"same bytes").unwrap();
        fs::write(&b, b"same bytes").unwrap();

        let mut hasher = Hasher::new();
        assert_eq!(
            hasher.digest_file(&a).unwrap(),
            hasher.digest_file(&b).unwrap()
        );
    }

    #[test]
    fn test_different_content_different_digest() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.bin");
        let b = dir.path().join("b.bin");
        fs::write(&a, b"one").unwrap();
        fs::write(&b, b"two").unwrap();

        let mut hasher = Hasher::new();
        assert_ne!(
            hasher.digest_file(&a).unwrap(),
            hasher.digest_file(&b).unwrap()
        );
    }

    #[test]
    fn test_content_spanning_multiple_buffer_reads() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("long.bin");
        fs::write(&path, b"0123456789abcdefghij").unwrap();

        // A tiny buffer forces several read iterations; the digest must
        // match a single-read pass over the same bytes
        let mut small = Hasher::with_buffer_size(4);
        let mut large = Hasher::new();

        assert_eq!(
            small.digest_file(&path).unwrap(),
            large.digest_file(&path).unwrap()
        );
    }

    #[test]
    fn test_empty_file_digests_cleanly() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty");
        fs::write(&path, b"").unwrap();

        let mut hasher = Hasher::new();
        assert_eq!(
            hasher.digest_file(&path).unwrap(),
            *blake3::Hasher::new().finalize().as_bytes()
        );
    }

    #[test]
    fn test_missing_file_reports_not_found() {
        let mut hasher = Hasher::new();
        let result = hasher.digest_file(Path::new("/no/such/file/anywhere"));

        assert!(matches!(result, Err(HashError::NotFound(_))));
    }
}
