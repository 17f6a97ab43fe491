//! Unicode path normalization utilities.
//!
//! Exclusion roots are compared against discovered paths, and file names are
//! compared against each other when matching by name. Both comparisons go
//! through NFC normalization first.
//!
//! # Background
//!
//! macOS uses NFD (Decomposed) normalization for file paths, while Windows
//! and Linux typically use NFC (Composed) normalization. This means the same
//! visual filename can have different byte representations:
//!
//! - NFC: `café.txt` - 'é' is U+00E9 (single code point)
//! - NFD: `café.txt` - 'e' U+0065 + combining acute accent U+0301
//!
//! # Example
//!
//! ```
//! use dupefinder::scanner::path_utils::{fold_name, normalize_path_str};
//!
//! let nfc = "café.txt";
//! let nfd = "cafe\u{0301}.txt";
//!
//! assert_eq!(normalize_path_str(nfc), normalize_path_str(nfd));
//! assert_eq!(fold_name("CAFÉ.TXT"), fold_name(nfd));
//! ```

use std::path::{Component, Path, PathBuf};
use unicode_normalization::UnicodeNormalization;

/// Normalize a path string to NFC (Composed) form.
///
/// # Example
///
/// ```
/// use dupefinder::scanner::path_utils::normalize_path_str;
///
/// let nfd = "cafe\u{0301}.txt"; // NFD form
/// assert_eq!(normalize_path_str(nfd), "café.txt");
/// ```
#[must_use]
pub fn normalize_path_str(s: &str) -> String {
    s.nfc().collect()
}

/// Lexically normalize a path for prefix comparison.
///
/// Each component is converted to NFC and `.` components are dropped.
/// Components that are not valid UTF-8 are kept unchanged. The file system
/// is never consulted, so symlinks are not resolved.
///
/// # Example
///
/// ```
/// use std::path::{Path, PathBuf};
/// use dupefinder::scanner::path_utils::normalize_path;
///
/// let normalized = normalize_path(Path::new("./docs/./cafe\u{0301}"));
/// assert_eq!(normalized, PathBuf::from("docs/café"));
/// ```
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::Normal(part) => match part.to_str() {
                Some(s) => out.push(normalize_path_str(s)),
                None => out.push(part),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Check whether `path` lies at or under `prefix`.
///
/// Matching is component-based: `/ref/path_suffix` is not under `/ref/path`.
/// Both sides are normalized with [`normalize_path`]. On Windows the
/// comparison is case-insensitive.
#[must_use]
pub fn path_starts_with(path: &Path, prefix: &Path) -> bool {
    let path = normalize_path(path);
    let prefix = normalize_path(prefix);

    if cfg!(windows) {
        let p = PathBuf::from(path.to_string_lossy().to_lowercase());
        let r = PathBuf::from(prefix.to_string_lossy().to_lowercase());
        p.starts_with(r)
    } else {
        path.starts_with(prefix)
    }
}

/// Case-fold a file name for name matching.
///
/// The name is NFC-normalized and lowercased, so `Photo.JPG` and
/// `photo.jpg` compare equal.
#[must_use]
pub fn fold_name(name: &str) -> String {
    normalize_path_str(name).to_lowercase()
}

/// Collapse a list of roots so that every tree is walked once.
///
/// Roots equal to, or nested under, an earlier root are dropped. A root that
/// contains earlier roots replaces them at the position of the first one it
/// covers. Order of the survivors otherwise follows the input.
///
/// # Example
///
/// ```
/// use std::path::PathBuf;
/// use dupefinder::scanner::path_utils::non_overlapping_roots;
///
/// let roots = vec![
///     PathBuf::from("/data/photos"),
///     PathBuf::from("/data"),
///     PathBuf::from("/backup"),
///     PathBuf::from("/backup"),
/// ];
/// assert_eq!(
///     non_overlapping_roots(&roots),
///     vec![PathBuf::from("/data"), PathBuf::from("/backup")]
/// );
/// ```
#[must_use]
pub fn non_overlapping_roots(roots: &[PathBuf]) -> Vec<PathBuf> {
    let mut result: Vec<PathBuf> = Vec::new();

    for root in roots {
        if result.iter().any(|kept| path_starts_with(root, kept)) {
            log::debug!("Root {} already covered, skipping", root.display());
            continue;
        }

        match result.iter().position(|kept| path_starts_with(kept, root)) {
            Some(first) => {
                result[first] = root.clone();
                let mut idx = first + 1;
                while idx < result.len() {
                    if path_starts_with(&result[idx], root) {
                        result.remove(idx);
                    } else {
                        idx += 1;
                    }
                }
            }
            None => result.push(root.clone()),
        }
    }

    result
}
