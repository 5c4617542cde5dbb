//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Grouping hashed files by digest with first-seen keeper selection
//! - The dedupe pass over one directory, with optional deletion
//! - Report events and the sinks that receive them

pub mod events;
pub mod finder;
pub mod groups;

pub use events::{CollectingSink, DedupeEvent, EventSink, MemberRole, NullSink};
pub use finder::{DedupeOptions, DedupeReport, Deduplicator, FinderError, RunStatus};
pub use groups::{duplicate_groups, group_by_digest, HashGroup};
