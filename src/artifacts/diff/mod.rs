//! Tree comparison
//!
//! - `tree_diff`: Recursive name/status diff between two tree snapshots
//!
//! Only which paths changed (and their old/new content ids) is computed.
//! Line-level patches and rename detection are out of scope.

pub mod tree_diff;

use crate::artifacts::objects::object_id::ObjectId;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Modified,
    Deleted,
}

impl ChangeKind {
    pub fn status_char(&self) -> char {
        match self {
            ChangeKind::Added => 'A',
            ChangeKind::Modified => 'M',
            ChangeKind::Deleted => 'D',
        }
    }
}

/// One changed path between two trees
///
/// The absent side of an addition or deletion carries [`ObjectId::ZERO`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffEntry {
    pub path: PathBuf,
    pub change: ChangeKind,
    pub old_id: ObjectId,
    pub new_id: ObjectId,
}
