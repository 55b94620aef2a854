//! Commit history traversal
//!
//! - `commit_graph`: lazily parsed commit headers shared between walks
//! - `rev_walk`: date-ordered walk with optional topological and reverse output
//! - `rev_filter`: composable commit filters (boolean algebra, time bounds, paging)
//! - `pickaxe`: keep commits that change the number of occurrences of a pattern
//! - `pattern_counter`: literal and regex occurrence counting over blob bytes
//!
//! ## Algorithm
//!
//! Pending commits sit in a priority queue ordered by commit time, ties broken
//! by insertion order. Each popped commit has its parents discovered and is then
//! offered to the filter, which may include it, skip it, or end the walk.
//! Uninteresting marks flow down to ancestors and the walk stops once only
//! uninteresting commits remain.

pub mod commit_graph;
pub mod pattern_counter;
pub mod pickaxe;
pub mod rev_filter;
pub mod rev_walk;

#[cfg(test)]
pub(crate) mod test_repo;
