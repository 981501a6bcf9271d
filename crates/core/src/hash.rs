//! Content hashing for change detection.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use sha2::{Digest, Sha256};

/// SHA-256 digest of a file's contents.
///
/// Digests are only ever compared for equality between passes, so any
/// deterministic fixed-size digest would do; SHA-256 keeps accidental
/// collisions out of the picture.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Hash a byte slice.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        Self(hasher.finalize().into())
    }

    /// Hash a file by reading its full contents into memory.
    pub fn of_file(path: &Path) -> io::Result<Self> {
        let data = fs::read(path)?;
        Ok(Self::from_bytes(&data))
    }

    /// Lowercase hex rendering of the full digest.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // First 12 hex chars are plenty for log and assertion output.
        write!(f, "ContentHash({})", &self.to_hex()[..12])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_identical_bytes_hash_identically() {
        let a = ContentHash::from_bytes(b"hello world");
        let b = ContentHash::from_bytes(b"hello world");
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_bytes_hash_differently() {
        let a = ContentHash::from_bytes(b"hello world");
        let b = ContentHash::from_bytes(b"hello worlb");
        assert_ne!(a, b);
    }

    #[test]
    fn test_known_digest_of_empty_input() {
        assert_eq!(
            ContentHash::from_bytes(b"").to_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_file_hash_matches_byte_hash() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("data.bin");
        fs::write(&path, b"some file contents").unwrap();

        let from_file = ContentHash::of_file(&path).unwrap();
        assert_eq!(from_file, ContentHash::from_bytes(b"some file contents"));
    }

    #[test]
    fn test_of_file_reports_missing_file() {
        let tmp = TempDir::new().unwrap();
        let err = ContentHash::of_file(&tmp.path().join("absent.txt")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_debug_is_truncated() {
        let rendered = format!("{:?}", ContentHash::from_bytes(b"x"));
        assert!(rendered.starts_with("ContentHash("));
        assert!(rendered.len() < 32, "expected truncated digest, got {rendered}");
    }
}
