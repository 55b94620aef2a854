//! Commit graph model
//!
//! [`CommitGraph`] is the shared, read-only face of the commit DAG: it resolves
//! ids into [`CommitNode`]s and caches the parsed headers and bodies. Content
//! addressing makes every cached entry immutable, so one graph can back any
//! number of walks, sequential or concurrent.
//!
//! Walk state never lives here. Each walk keeps its own [`WalkFlags`] per id.
//!
//! ## Concurrency
//!
//! Caches sit behind `RwLock`s. Two walks that miss on the same id at the same
//! time both parse it and the second insert is dropped: population is
//! at-least-once and idempotent.

use crate::artifacts::database::object_store::ObjectStore;
use crate::artifacts::objects::commit::{CommitHeader, short_message};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::WalkResult;
use bitflags::bitflags;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

bitflags! {
    /// Per-walk state of a commit
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct WalkFlags: u8 {
        /// Queued as a candidate (or reached from a start point)
        const DISCOVERED = 0b0000_0001;
        /// Popped from the queue and its parents expanded
        const PARSED_HEADER = 0b0000_0010;
        const PARSED_BODY = 0b0000_0100;
        const EMITTED = 0b0000_1000;
        /// Reachable from an excluded revision
        const UNINTERESTING = 0b0001_0000;
        /// Held back by topological ordering until its children are out
        const TOPO_DELAY = 0b0010_0000;
    }
}

impl fmt::Debug for WalkFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = self.iter_names().map(|(name, _)| name).collect::<Vec<_>>();
        if names.is_empty() {
            write!(f, "NONE")
        } else {
            write!(f, "{}", names.join("|"))
        }
    }
}

/// A resolved commit: its id plus the shared, immutable header
#[derive(Clone)]
pub struct CommitNode {
    id: ObjectId,
    header: Arc<CommitHeader>,
}

impl CommitNode {
    pub fn id(&self) -> &ObjectId {
        &self.id
    }

    pub fn tree(&self) -> &ObjectId {
        &self.header.tree
    }

    /// Parents in stored order; the first one is the mainline.
    pub fn parents(&self) -> &[ObjectId] {
        &self.header.parents
    }

    pub fn is_root(&self) -> bool {
        self.header.parents.is_empty()
    }

    pub fn is_merge(&self) -> bool {
        self.header.parents.len() > 1
    }

    pub fn commit_time(&self) -> i64 {
        self.header.commit_time
    }
}

impl PartialEq for CommitNode {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for CommitNode {}

impl fmt::Debug for CommitNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CommitNode({} @ {})", self.id.to_short_oid(), self.header.commit_time)
    }
}

/// Shared cache of commit headers and bodies over an object store
pub struct CommitGraph {
    store: Arc<dyn ObjectStore>,
    headers: RwLock<HashMap<ObjectId, Arc<CommitHeader>>>,
    bodies: RwLock<HashMap<ObjectId, Arc<str>>>,
}

impl CommitGraph {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        CommitGraph {
            store,
            headers: RwLock::new(HashMap::new()),
            bodies: RwLock::new(HashMap::new()),
        }
    }

    pub fn store(&self) -> &dyn ObjectStore {
        self.store.as_ref()
    }

    /// Resolve a commit id, parsing its header on first access.
    ///
    /// Fails with `ObjectMissing` for unknown ids and `ObjectTypeMismatch`
    /// when the id names a tree or blob.
    pub fn resolve(&self, id: &ObjectId) -> WalkResult<CommitNode> {
        if let Some(header) = self.headers.read().get(id) {
            return Ok(CommitNode {
                id: *id,
                header: header.clone(),
            });
        }

        let parsed = Arc::new(self.store.parse_header(id)?);
        let header = self.headers.write().entry(*id).or_insert(parsed).clone();

        Ok(CommitNode { id: *id, header })
    }

    /// Full commit message, materialized on first access.
    pub fn body(&self, node: &CommitNode) -> WalkResult<Arc<str>> {
        if let Some(body) = self.bodies.read().get(node.id()) {
            return Ok(body.clone());
        }

        let parsed: Arc<str> = self.store.parse_body(node.id())?.into();
        let body = self.bodies.write().entry(node.id).or_insert(parsed).clone();

        Ok(body)
    }

    pub fn short_message(&self, node: &CommitNode) -> WalkResult<String> {
        Ok(short_message(&self.body(node)?))
    }

    pub fn cached_headers(&self) -> usize {
        self.headers.read().len()
    }
}

impl fmt::Debug for CommitGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommitGraph")
            .field("headers", &self.headers.read().len())
            .field("bodies", &self.bodies.read().len())
            .finish()
    }
}
