//! Pickaxe search (`log -S`)
//!
//! A commit matches when some path it changes holds a different number of
//! occurrences of the pattern before and after the change. Merges are compared
//! against every parent independently and match if any comparison does; root
//! commits are compared against the empty tree.
//!
//! Unlike the other filters this one reads file contents, so it is by far the
//! most expensive predicate a walk can evaluate. Combine it behind cheaper
//! filters in an `AND` when possible.

use crate::artifacts::database::object_store::ObjectStore;
use crate::artifacts::diff::DiffEntry;
use crate::artifacts::log::commit_graph::{CommitGraph, CommitNode};
use crate::artifacts::log::pattern_counter::PatternCounter;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::WalkResult;
use derive_new::new;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct PickaxeOptions {
    pub pattern: String,
    /// Treat the pattern as a regular expression instead of a literal
    #[new(default)]
    pub use_regex: bool,
}

impl PickaxeOptions {
    pub fn with_regex(mut self, use_regex: bool) -> Self {
        self.use_regex = use_regex;
        self
    }
}

#[derive(Debug, Clone)]
pub struct PickaxeFilter {
    counter: Arc<PatternCounter>,
}

impl PickaxeFilter {
    /// Build the filter, rejecting empty or uncompilable patterns up front.
    pub fn create(pattern: &str, use_regex: bool) -> WalkResult<Self> {
        let counter = if use_regex {
            PatternCounter::regex(pattern)?
        } else {
            PatternCounter::literal(pattern)?
        };

        Ok(PickaxeFilter {
            counter: Arc::new(counter),
        })
    }

    pub fn from_options(options: &PickaxeOptions) -> WalkResult<Self> {
        Self::create(&options.pattern, options.use_regex)
    }

    pub fn pattern(&self) -> &str {
        self.counter.pattern()
    }

    pub fn is_regex(&self) -> bool {
        matches!(*self.counter, PatternCounter::Regex(_))
    }

    pub fn include(&self, graph: &CommitGraph, commit: &CommitNode) -> WalkResult<bool> {
        let store = graph.store();

        if commit.is_root() {
            return self.trees_differ(store, None, commit.tree());
        }

        for parent_id in commit.parents() {
            let parent = graph.resolve(parent_id)?;
            if self.trees_differ(store, Some(parent.tree()), commit.tree())? {
                tracing::debug!(
                    commit = %commit.id().to_short_oid(),
                    parent = %parent_id.to_short_oid(),
                    pattern = self.pattern(),
                    "pickaxe match"
                );
                return Ok(true);
            }
        }

        Ok(false)
    }

    fn trees_differ(
        &self,
        store: &dyn ObjectStore,
        old_tree: Option<&ObjectId>,
        new_tree: &ObjectId,
    ) -> WalkResult<bool> {
        for entry in store.diff(old_tree, new_tree)? {
            if self.entry_differs(store, &entry)? {
                return Ok(true);
            }
        }

        Ok(false)
    }

    fn entry_differs(&self, store: &dyn ObjectStore, entry: &DiffEntry) -> WalkResult<bool> {
        let old_count = self.occurrences(store, &entry.old_id)?;
        let new_count = self.occurrences(store, &entry.new_id)?;

        tracing::trace!(
            path = %entry.path.display(),
            change = %entry.change.status_char(),
            old_count,
            new_count,
            "pickaxe counts"
        );

        Ok(old_count != new_count)
    }

    fn occurrences(&self, store: &dyn ObjectStore, id: &ObjectId) -> WalkResult<usize> {
        if id.is_zero() {
            return Ok(0);
        }

        Ok(self.counter.count(&store.load(id)?))
    }
}
