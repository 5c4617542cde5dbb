//! Digest grouping and keeper selection.
//!
//! # Overview
//!
//! Files are grouped by content digest. Two properties are preserved so
//! that results are reproducible for a given enumeration order:
//!
//! - Members of a group keep the order in which they were hashed, so the
//!   first member (the keeper) is always the first one discovered.
//! - Groups are returned in order of the first appearance of their digest.
//!
//! A group with a single member is not a duplicate set.
//!
//! # Example
//!
//! ```
//! use fileman::duplicates::group_by_digest;
//! use fileman::scanner::{EntryMetadata, FileEntry};
//! use std::path::PathBuf;
//! use std::time::SystemTime;
//!
//! let meta = EntryMetadata { size: 5, modified: SystemTime::UNIX_EPOCH };
//! let a = FileEntry::new(PathBuf::from("/d/a.txt"), false, meta);
//! let b = FileEntry::new(PathBuf::from("/d/b.txt"), false, meta);
//! let c = FileEntry::new(PathBuf::from("/d/c.txt"), false, meta);
//!
//! let groups = group_by_digest(vec![(a, [1; 32]), (b, [1; 32]), (c, [2; 32])]);
//!
//! assert_eq!(groups.len(), 2);
//! assert!(groups[0].is_duplicate());
//! assert_eq!(groups[0].keeper().unwrap().name, "a.txt");
//! assert!(!groups[1].is_duplicate());
//! ```

use std::collections::HashMap;

use crate::scanner::{hash_to_hex, Digest, FileEntry};

/// A set of files sharing one content digest.
#[derive(Debug, Clone)]
pub struct HashGroup {
    /// Content digest shared by every member
    pub digest: Digest,
    /// Members in hashing order; never empty
    pub members: Vec<FileEntry>,
}

impl HashGroup {
    /// Start a group with its first member.
    #[must_use]
    pub fn new(digest: Digest, first: FileEntry) -> Self {
        Self {
            digest,
            members: vec![first],
        }
    }

    /// Append a member.
    pub fn push(&mut self, file: FileEntry) {
        self.members.push(file);
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always false for groups built by [`group_by_digest`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// A group is a duplicate group iff it has two or more members.
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        self.members.len() > 1
    }

    /// The member that is preserved: the first one discovered.
    #[must_use]
    pub fn keeper(&self) -> Option<&FileEntry> {
        self.members.first()
    }

    /// Every member except the keeper.
    #[must_use]
    pub fn candidates(&self) -> &[FileEntry] {
        self.members.get(1..).unwrap_or(&[])
    }

    /// Digest as lowercase hex.
    #[must_use]
    pub fn digest_hex(&self) -> String {
        hash_to_hex(&self.digest)
    }

    /// Bytes that removing all candidates would free.
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        self.candidates().iter().map(|f| f.metadata.size).sum()
    }
}

/// Group hashed files by digest.
///
/// Returns every group, duplicates or not, ordered by first appearance of
/// the digest. Member order within a group is input order.
#[must_use]
pub fn group_by_digest<I>(hashed: I) -> Vec<HashGroup>
where
    I: IntoIterator<Item = (FileEntry, Digest)>,
{
    let mut index: HashMap<Digest, usize> = HashMap::new();
    let mut groups: Vec<HashGroup> = Vec::new();

    for (file, digest) in hashed {
        match index.get(&digest) {
            Some(&i) => groups[i].push(file),
            None => {
                index.insert(digest, groups.len());
                groups.push(HashGroup::new(digest, file));
            }
        }
    }

    groups
}

/// Keep only duplicate groups, preserving order.
#[must_use]
pub fn duplicate_groups(groups: Vec<HashGroup>) -> Vec<HashGroup> {
    groups.into_iter().filter(HashGroup::is_duplicate).collect()
}
