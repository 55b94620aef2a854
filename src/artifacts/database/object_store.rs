//! Collaborator interfaces consumed by the walk
//!
//! The walk engine and its filters never touch storage directly. They see the
//! object database only through these three traits, bundled as [`ObjectStore`].
//! Implementations must be shareable across threads: independent walks may
//! read the same store concurrently.

use crate::artifacts::diff::DiffEntry;
use crate::artifacts::objects::commit::CommitHeader;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::WalkResult;
use bytes::Bytes;

/// Content-addressed byte loader
pub trait ObjectLoader {
    /// Raw content of the object, without its `<type> <size>` header.
    ///
    /// Fails with `ObjectMissing` when the id cannot be resolved.
    fn load(&self, id: &ObjectId) -> WalkResult<Bytes>;
}

pub trait CommitParser {
    fn parse_header(&self, id: &ObjectId) -> WalkResult<CommitHeader>;

    fn parse_body(&self, id: &ObjectId) -> WalkResult<String>;
}

/// Name/status tree comparison
pub trait TreeDiffer {
    /// Changed paths between two trees, ordered by path.
    ///
    /// `None` on the old side stands for the empty tree.
    fn diff(&self, old_tree: Option<&ObjectId>, new_tree: &ObjectId) -> WalkResult<Vec<DiffEntry>>;
}

pub trait ObjectStore: ObjectLoader + CommitParser + TreeDiffer + Send + Sync {}

impl<T> ObjectStore for T where T: ObjectLoader + CommitParser + TreeDiffer + Send + Sync {}
