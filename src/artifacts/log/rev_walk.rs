//! Revision walk
//!
//! [`RevWalk`] pulls commits from one or more start points, newest committer
//! time first, and emits those its [`RevFilter`] includes.
//!
//! ## Algorithm
//!
//! Candidates sit in a max-heap keyed by commit time; equal times leave in
//! insertion order. Popping a candidate expands its parents into the heap
//! (each commit is queued at most once per pass), then the filter decides
//! whether the candidate is emitted. Excluded commits are still expanded, so
//! filtering never hides ancestors.
//!
//! Commits marked uninteresting are expanded but never emitted, and they pass
//! the mark on to their ancestors. Once only uninteresting candidates remain
//! the pass ends early. Like any date-driven walk this relies on commit times
//! being roughly monotonic: with heavy clock skew an ancestor of an excluded
//! commit can be emitted before the exclusion reaches it.
//!
//! ## Lifecycle
//!
//! ```text
//! configured --next()--> running --(empty | stop | error)--> exhausted
//!      ^                                                         |
//!      +------------------------- reset() ----------------------+
//! ```
//!
//! All per-pass state (flags, queue, buffered output) lives in the walk. The
//! [`CommitGraph`] it reads from is shared and may serve other walks at the
//! same time.

use crate::artifacts::log::commit_graph::{CommitGraph, CommitNode, WalkFlags};
use crate::artifacts::log::rev_filter::{FilterOutcome, RevFilter};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{WalkError, WalkResult};
use bitflags::bitflags;
use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap, VecDeque};
use std::sync::Arc;

bitflags! {
    /// Output ordering; empty means commit time descending
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct RevSort: u8 {
        /// Never emit a commit before its descendants in the output
        const TOPO = 0b01;
        /// Emit the final order back to front
        const REVERSE = 0b10;
    }
}

impl RevSort {
    fn buffers_output(&self) -> bool {
        self.intersects(RevSort::TOPO | RevSort::REVERSE)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WalkState {
    Configured,
    Running,
    Exhausted,
}

struct Pending {
    commit_time: i64,
    sequence: Reverse<u64>,
    node: CommitNode,
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.commit_time, self.sequence).cmp(&(other.commit_time, other.sequence))
    }
}

pub struct RevWalk {
    graph: Arc<CommitGraph>,
    filter: RevFilter,
    sort: RevSort,
    state: WalkState,
    flags: HashMap<ObjectId, WalkFlags>,
    pending: BinaryHeap<Pending>,
    /// Pending entries not flagged uninteresting
    interesting_pending: usize,
    sequence: u64,
    output: Option<VecDeque<CommitNode>>,
}

impl RevWalk {
    pub fn new(graph: Arc<CommitGraph>) -> Self {
        RevWalk {
            graph,
            filter: RevFilter::All,
            sort: RevSort::empty(),
            state: WalkState::Configured,
            flags: HashMap::new(),
            pending: BinaryHeap::new(),
            interesting_pending: 0,
            sequence: 0,
            output: None,
        }
    }

    pub fn graph(&self) -> &Arc<CommitGraph> {
        &self.graph
    }

    pub fn filter(&self) -> &RevFilter {
        &self.filter
    }

    pub fn sort(&self) -> RevSort {
        self.sort
    }

    /// Flags this pass has recorded for `id`.
    pub fn flags(&self, id: &ObjectId) -> WalkFlags {
        self.flags.get(id).copied().unwrap_or_default()
    }

    pub fn set_filter(&mut self, filter: RevFilter) -> WalkResult<()> {
        self.ensure_configurable()?;
        tracing::debug!(%filter, "filter installed");
        self.filter = filter;

        Ok(())
    }

    pub fn set_sort(&mut self, sort: RevSort) -> WalkResult<()> {
        self.ensure_configurable()?;
        self.sort = sort;

        Ok(())
    }

    /// Walk from `id`; fails if it does not name a commit.
    pub fn mark_start(&mut self, id: &ObjectId) -> WalkResult<()> {
        self.ensure_configurable()?;
        let node = self.graph.resolve(id)?;
        self.discover(node);

        Ok(())
    }

    /// Exclude `id` and everything reachable from it.
    pub fn mark_uninteresting(&mut self, id: &ObjectId) -> WalkResult<()> {
        self.ensure_configurable()?;
        let node = self.graph.resolve(id)?;
        self.carry_uninteresting(id)?;
        self.discover(node);

        Ok(())
    }

    /// Next included commit, or `None` once the pass is over.
    ///
    /// An error ends the pass: it is returned once and every later call
    /// yields `None` until [`RevWalk::reset`].
    pub fn next(&mut self) -> WalkResult<Option<CommitNode>> {
        match self.state {
            WalkState::Exhausted => return Ok(None),
            WalkState::Configured => {
                self.state = WalkState::Running;
                tracing::debug!(sort = ?self.sort, pending = self.pending.len(), "walk started");
                if self.sort.buffers_output() {
                    let buffered = self.drain_by_date();
                    let buffered = self.finish(buffered)?;
                    self.output = Some(self.apply_sort(buffered).into());
                }
            }
            WalkState::Running => {}
        }

        let next = match self.output.as_mut() {
            Some(output) => Ok(output.pop_front()),
            None => self.next_by_date(),
        };

        match self.finish(next)? {
            Some(node) => Ok(Some(node)),
            None => {
                self.state = WalkState::Exhausted;
                Ok(None)
            }
        }
    }

    /// Start a new pass: drop all flags and candidates, keep the sort order and
    /// a fresh copy of the filter. Start points must be marked again.
    pub fn reset(&mut self) {
        tracing::debug!(touched = self.flags.len(), "walk reset");
        self.flags.clear();
        self.clear_pending();
        self.sequence = 0;
        self.output = None;
        self.filter = self.filter.duplicate();
        self.state = WalkState::Configured;
    }

    /// Full message of `node`, loaded through the shared graph.
    pub fn body(&mut self, node: &CommitNode) -> WalkResult<Arc<str>> {
        let body = self.graph.body(node)?;
        self.flags.entry(*node.id()).or_default().insert(WalkFlags::PARSED_BODY);

        Ok(body)
    }

    pub fn commits(&mut self) -> Commits<'_> {
        Commits { walk: self }
    }

    fn ensure_configurable(&self) -> WalkResult<()> {
        match self.state {
            WalkState::Configured => Ok(()),
            WalkState::Running | WalkState::Exhausted => Err(WalkError::WalkInProgress),
        }
    }

    /// Mark the end of the pass on error, passing the result through.
    fn finish<T>(&mut self, result: WalkResult<T>) -> WalkResult<T> {
        if let Err(err) = &result {
            tracing::debug!(%err, "walk aborted");
            self.state = WalkState::Exhausted;
            self.clear_pending();
            self.output = None;
        }

        result
    }

    fn discover(&mut self, node: CommitNode) {
        let flags = self.flags.entry(*node.id()).or_default();
        if flags.contains(WalkFlags::DISCOVERED) {
            return;
        }
        flags.insert(WalkFlags::DISCOVERED);
        if !flags.contains(WalkFlags::UNINTERESTING) {
            self.interesting_pending += 1;
        }

        self.sequence += 1;
        self.pending.push(Pending {
            commit_time: node.commit_time(),
            sequence: Reverse(self.sequence),
            node,
        });
    }

    fn next_by_date(&mut self) -> WalkResult<Option<CommitNode>> {
        while let Some(Pending { node, .. }) = self.pending.pop() {
            let uninteresting = self.flags(node.id()).contains(WalkFlags::UNINTERESTING);
            if !uninteresting {
                self.interesting_pending -= 1;
            }
            self.expand(&node, uninteresting)?;

            if uninteresting {
                if self.interesting_pending == 0 {
                    tracing::debug!(at = %node.id().to_short_oid(), "only uninteresting commits left");
                    self.clear_pending();
                    return Ok(None);
                }
                continue;
            }

            if self.filter.requires_commit_body() {
                self.body(&node)?;
            }

            let outcome = self.filter.include(&self.graph, &node)?;
            tracing::debug!(commit = %node.id().to_short_oid(), ?outcome, "filtered");

            match outcome {
                FilterOutcome::Include => {
                    self.flags.entry(*node.id()).or_default().insert(WalkFlags::EMITTED);
                    return Ok(Some(node));
                }
                FilterOutcome::Exclude => continue,
                FilterOutcome::ExcludeAndStop => {
                    self.clear_pending();
                    return Ok(None);
                }
            }
        }

        Ok(None)
    }

    fn expand(&mut self, node: &CommitNode, uninteresting: bool) -> WalkResult<()> {
        self.flags.entry(*node.id()).or_default().insert(WalkFlags::PARSED_HEADER);

        for parent_id in node.parents() {
            if uninteresting {
                self.carry_uninteresting(parent_id)?;
            }
            if !self.flags(parent_id).contains(WalkFlags::DISCOVERED) {
                let parent = self.graph.resolve(parent_id)?;
                self.discover(parent);
            }
        }

        Ok(())
    }

    /// Flag `id` uninteresting, along with any ancestors this pass already expanded.
    fn carry_uninteresting(&mut self, id: &ObjectId) -> WalkResult<()> {
        let mut stack = vec![*id];

        while let Some(id) = stack.pop() {
            let flags = self.flags.entry(id).or_default();
            if flags.contains(WalkFlags::UNINTERESTING) {
                continue;
            }
            flags.insert(WalkFlags::UNINTERESTING);

            if flags.contains(WalkFlags::PARSED_HEADER) {
                stack.extend_from_slice(self.graph.resolve(&id)?.parents());
            } else if flags.contains(WalkFlags::DISCOVERED) {
                // still queued, counted as interesting when discovered
                self.interesting_pending -= 1;
            }
        }

        Ok(())
    }

    fn clear_pending(&mut self) {
        self.pending.clear();
        self.interesting_pending = 0;
    }

    fn drain_by_date(&mut self) -> WalkResult<Vec<CommitNode>> {
        let mut nodes = Vec::new();
        while let Some(node) = self.next_by_date()? {
            nodes.push(node);
        }

        Ok(nodes)
    }

    fn apply_sort(&mut self, nodes: Vec<CommitNode>) -> Vec<CommitNode> {
        let mut nodes = if self.sort.contains(RevSort::TOPO) {
            self.topo_sort(nodes)
        } else {
            nodes
        };
        if self.sort.contains(RevSort::REVERSE) {
            nodes.reverse();
        }

        nodes
    }

    /// Reorder date-ordered `nodes` so no commit precedes one of its children.
    ///
    /// A commit whose children are not all out yet is delayed; it is emitted
    /// right after its last child.
    fn topo_sort(&mut self, nodes: Vec<CommitNode>) -> Vec<CommitNode> {
        let mut children = HashMap::<ObjectId, usize>::new();
        for node in &nodes {
            children.entry(*node.id()).or_default();
        }
        for node in &nodes {
            for parent_id in node.parents() {
                if let Some(count) = children.get_mut(parent_id) {
                    *count += 1;
                }
            }
        }

        let mut delayed = HashMap::new();
        let mut queue = VecDeque::from(nodes);
        let mut sorted = Vec::with_capacity(queue.len());

        while let Some(node) = queue.pop_front() {
            if children.get(node.id()).is_some_and(|count| *count > 0) {
                self.flags.entry(*node.id()).or_default().insert(WalkFlags::TOPO_DELAY);
                delayed.insert(*node.id(), node);
                continue;
            }

            for parent_id in node.parents() {
                let Some(count) = children.get_mut(parent_id) else {
                    continue;
                };
                *count -= 1;
                if *count == 0
                    && let Some(parent) = delayed.remove(parent_id)
                {
                    self.flags.entry(*parent_id).or_default().remove(WalkFlags::TOPO_DELAY);
                    queue.push_front(parent);
                }
            }
            sorted.push(node);
        }

        sorted
    }
}

impl std::fmt::Debug for RevWalk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RevWalk")
            .field("filter", &self.filter.to_string())
            .field("sort", &self.sort)
            .field("state", &self.state)
            .field("pending", &self.pending.len())
            .finish()
    }
}

/// Iterator over a walk; ends after the first error
pub struct Commits<'w> {
    walk: &'w mut RevWalk,
}

impl Iterator for Commits<'_> {
    type Item = WalkResult<CommitNode>;

    fn next(&mut self) -> Option<Self::Item> {
        self.walk.next().transpose()
    }
}
