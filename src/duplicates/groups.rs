//! Composite keys and duplicate group construction.
//!
//! # Overview
//!
//! Every candidate gets a [`CompositeKey`] built from the enabled match
//! properties. Disabled properties are `None` for every candidate, so they
//! never split a bucket. Candidates with equal keys form a bucket; buckets
//! with two or more members are duplicate groups.
//!
//! The content digest is the only expensive component. It is computed at
//! most once per candidate and only when content matching is enabled.
//!
//! # Example
//!
//! ```
//! use dupefinder::duplicates::{group_candidates, Criteria};
//! use dupefinder::scanner::{Candidate, Hasher};
//! use std::path::PathBuf;
//!
//! let files = vec![
//!     Candidate::new(PathBuf::from("/a.txt"), 100, 0),
//!     Candidate::new(PathBuf::from("/b.txt"), 100, 0),
//!     Candidate::new(PathBuf::from("/c.txt"), 200, 0),
//! ];
//!
//! let criteria = Criteria::default().with_match_size(true);
//! let groups = group_candidates(files, &criteria, Hasher::new());
//!
//! assert_eq!(groups.len(), 1);
//! assert_eq!(groups[0].len(), 2);
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::scanner::path_utils::fold_name;
use crate::scanner::{Candidate, DigestToken, Hasher};

use super::Criteria;

/// Bucket key for one candidate.
///
/// Each component is `Some` only when its property is matched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompositeKey {
    /// Case-folded base name
    pub name: Option<String>,
    /// Size in bytes
    pub size: Option<u64>,
    /// Modification time in epoch milliseconds
    pub modified_ms: Option<i64>,
    /// Content digest
    pub digest: Option<DigestToken>,
}

/// Which properties take part in the key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyFields {
    /// Match on case-folded name
    pub name: bool,
    /// Match on size
    pub size: bool,
    /// Match on modification time
    pub date: bool,
    /// Match on content digest
    pub content: bool,
}

impl From<&Criteria> for KeyFields {
    fn from(c: &Criteria) -> Self {
        Self {
            name: c.match_name,
            size: c.match_size,
            date: c.match_date,
            content: c.match_content,
        }
    }
}

impl CompositeKey {
    /// Build the key for a candidate.
    ///
    /// The hasher is only consulted when `fields.content` is set.
    #[must_use]
    pub fn build(candidate: &Candidate, fields: KeyFields, hasher: &Hasher) -> Self {
        Self {
            name: fields
                .name
                .then(|| candidate.file_name().map(|n| fold_name(&n)).unwrap_or_default()),
            size: fields.size.then_some(candidate.size),
            modified_ms: fields.date.then_some(candidate.modified_ms),
            digest: fields.content.then(|| hasher.digest(&candidate.path)),
        }
    }
}

/// Confirmed group of duplicate files.
///
/// Members keep the order in which they were discovered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    /// Key shared by all members
    pub key: CompositeKey,
    /// Member files, in discovery order
    pub files: Vec<Candidate>,
}

impl DuplicateGroup {
    /// Create a new duplicate group.
    #[must_use]
    pub fn new(key: CompositeKey, files: Vec<Candidate>) -> Self {
        Self { key, files }
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Get just the paths of files in this group.
    #[must_use]
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.iter().map(|f| f.path.clone()).collect()
    }

    /// Check whether `path` is a member.
    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        self.files.iter().any(|f| f.path == path)
    }

    /// Total size of all files in this group.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }

    /// Space freed by keeping only the first member.
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        match self.files.first() {
            Some(first) if self.files.len() > 1 => self.total_size().saturating_sub(first.size),
            _ => 0,
        }
    }

    /// Number of duplicate copies (total - 1 original).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.files.len().saturating_sub(1)
    }

    /// Shared content digest, when content was matched.
    #[must_use]
    pub fn digest(&self) -> Option<&DigestToken> {
        self.key.digest.as_ref()
    }
}

/// Statistics from the grouping phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupingStats {
    /// Candidates keyed
    pub candidates: usize,
    /// Content digests computed (successful or not)
    pub digests: usize,
    /// Digests that fell back to an unreadable token
    pub digest_failures: usize,
    /// Distinct keys seen
    pub buckets: usize,
    /// Buckets with two or more members
    pub groups: usize,
    /// Files that belong to a group
    pub duplicate_files: usize,
}

/// Incremental bucketing of candidates by composite key.
///
/// Buckets are kept in first-seen order so the final sort can be stable
/// with respect to discovery order.
#[derive(Debug)]
pub struct GroupingEngine {
    fields: KeyFields,
    hasher: Hasher,
    index: HashMap<CompositeKey, usize>,
    buckets: Vec<DuplicateGroup>,
    stats: GroupingStats,
}

impl GroupingEngine {
    /// Create an engine for the given criteria.
    #[must_use]
    pub fn new(criteria: &Criteria, hasher: Hasher) -> Self {
        Self {
            fields: KeyFields::from(criteria),
            hasher,
            index: HashMap::new(),
            buckets: Vec::new(),
            stats: GroupingStats::default(),
        }
    }

    /// Key a candidate and add it to its bucket.
    pub fn insert(&mut self, candidate: Candidate) {
        let key = CompositeKey::build(&candidate, self.fields, &self.hasher);
        self.stats.candidates += 1;

        if let Some(digest) = &key.digest {
            self.stats.digests += 1;
            if digest.is_unreadable() {
                self.stats.digest_failures += 1;
            }
        }

        match self.index.get(&key) {
            Some(&idx) => self.buckets[idx].files.push(candidate),
            None => {
                self.index.insert(key.clone(), self.buckets.len());
                self.buckets.push(DuplicateGroup::new(key, vec![candidate]));
            }
        }
    }

    /// Statistics so far.
    #[must_use]
    pub fn stats(&self) -> GroupingStats {
        self.stats
    }

    /// Keep buckets with at least two members, largest first.
    ///
    /// Ties keep the order in which their keys were first seen.
    #[must_use]
    pub fn finish(self) -> (Vec<DuplicateGroup>, GroupingStats) {
        let mut stats = self.stats;
        stats.buckets = self.buckets.len();

        let mut groups: Vec<DuplicateGroup> =
            self.buckets.into_iter().filter(|b| b.len() >= 2).collect();
        groups.sort_by(|a, b| b.len().cmp(&a.len()));

        stats.groups = groups.len();
        stats.duplicate_files = groups.iter().map(DuplicateGroup::len).sum();

        log::debug!(
            "Grouping complete: {} candidates, {} keys, {} groups",
            stats.candidates,
            stats.buckets,
            stats.groups
        );

        (groups, stats)
    }
}

/// Group a list of candidates in one call.
#[must_use]
pub fn group_candidates(
    candidates: impl IntoIterator<Item = Candidate>,
    criteria: &Criteria,
    hasher: Hasher,
) -> Vec<DuplicateGroup> {
    let mut engine = GroupingEngine::new(criteria, hasher);
    for candidate in candidates {
        engine.insert(candidate);
    }
    engine.finish().0
}
