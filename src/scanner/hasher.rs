//! SHA-256 file fingerprinting with streaming support.
//!
//! # Overview
//!
//! [`Hasher`] reads a file in fixed-size chunks and feeds them through
//! SHA-256, so memory use stays constant regardless of file size.
//!
//! Content matching must never abort a scan. [`Hasher::digest`] therefore
//! never fails: when a file cannot be read it returns
//! [`DigestToken::Unreadable`] carrying a fresh random UUID, which is equal
//! to no other token. Callers that need the error use [`Hasher::try_digest`].
//!
//! # Example
//!
//! ```no_run
//! use dupefinder::scanner::Hasher;
//! use std::path::Path;
//!
//! let hasher = Hasher::new();
//! let token = hasher.digest(Path::new("photo.jpg"));
//! println!("{token}");
//! ```

use std::fmt;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::HashError;

/// Default read chunk size (64 KiB).
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Content fingerprint of a file, or the substitute for a failed read.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DigestToken {
    /// Lowercase hexadecimal SHA-256 digest.
    Sha256(String),
    /// The file could not be read. Each failure gets its own token.
    Unreadable(Uuid),
}

impl DigestToken {
    /// Whether the token came from a failed read.
    #[must_use]
    pub fn is_unreadable(&self) -> bool {
        matches!(self, Self::Unreadable(_))
    }

    /// The hex digest, if the file was read successfully.
    #[must_use]
    pub fn as_hex(&self) -> Option<&str> {
        match self {
            Self::Sha256(hex) => Some(hex),
            Self::Unreadable(_) => None,
        }
    }
}

impl fmt::Display for DigestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sha256(hex) => f.write_str(hex),
            Self::Unreadable(id) => write!(f, "unreadable:{id}"),
        }
    }
}

/// Streaming SHA-256 hasher.
#[derive(Debug, Clone, Copy)]
pub struct Hasher {
    buffer_size: usize,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher {
    /// Create a hasher with the default buffer size.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    /// Set the read chunk size. Zero is raised to one byte.
    #[must_use]
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(1);
        self
    }

    /// Configured read chunk size.
    #[must_use]
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Compute the SHA-256 digest of a file.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file cannot be opened or a read fails.
    pub fn try_digest(&self, path: &Path) -> Result<String, HashError> {
        let mut file = File::open(path).map_err(|e| HashError::from_io(path, e))?;
        let mut hasher = Sha256::new();
        let mut buffer = vec![0u8; self.buffer_size];

        loop {
            let n = match file.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(HashError::from_io(path, e)),
            };
            hasher.update(&buffer[..n]);
        }

        Ok(format!("{:x}", hasher.finalize()))
    }

    /// Compute a digest token for a file, substituting a unique token on failure.
    #[must_use]
    pub fn digest(&self, path: &Path) -> DigestToken {
        match self.try_digest(path) {
            Ok(hex) => DigestToken::Sha256(hex),
            Err(e) => {
                log::warn!("Cannot hash {}: {}", path.display(), e);
                DigestToken::Unreadable(Uuid::new_v4())
            }
        }
    }

    /// Compute the SHA-256 digest of an in-memory buffer.
    #[must_use]
    pub fn digest_bytes(data: &[u8]) -> String {
        format!("{:x}", Sha256::digest(data))
    }
}
