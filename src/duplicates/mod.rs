//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Scan criteria (match properties, filters, roots)
//! - Composite keys and duplicate group construction
//! - The duplicate session driving walk and grouping
//! - A background worker running a session off the caller's thread

pub mod criteria;
pub mod finder;
pub mod groups;
pub mod worker;

pub use criteria::Criteria;
pub use finder::{DuplicateSession, FinderConfig, FinderError, ScanSummary};
pub use groups::{
    group_candidates, CompositeKey, DuplicateGroup, GroupingEngine, GroupingStats, KeyFields,
};
pub use worker::{ScanEvent, ScanOutcome, ScanWorker};
