//! Commit selection predicates
//!
//! A [`RevFilter`] decides, for each commit the walk pops, whether it is
//! emitted. Filters never influence which commits are *traversed*: excluded
//! commits still have their parents expanded. The one exception is
//! [`FilterOutcome::ExcludeAndStop`], which ends the walk outright.
//!
//! Filters compose into a tree with `NOT`, `AND` and `OR`. Most filters are
//! plain predicates; `MAX_COUNT` and `SKIP` count what they have seen and are
//! therefore bound to a single walk. [`RevFilter::duplicate`] returns an
//! equivalent filter with fresh counters for use by another walk.

use crate::artifacts::log::commit_graph::{CommitGraph, CommitNode};
use crate::artifacts::log::pickaxe::PickaxeFilter;
use crate::errors::{WalkError, WalkResult};
use regex::{Regex, RegexBuilder};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOutcome {
    Include,
    Exclude,
    /// Exclude this commit and end the walk
    ExcludeAndStop,
}

impl FilterOutcome {
    pub fn from_bool(include: bool) -> Self {
        if include {
            FilterOutcome::Include
        } else {
            FilterOutcome::Exclude
        }
    }

    pub fn is_stop(&self) -> bool {
        matches!(self, FilterOutcome::ExcludeAndStop)
    }
}

/// Committer-time window, bounds inclusive, in seconds since the epoch
///
/// A lower bound also stops the walk at the first older commit: in date order
/// everything after it is older still.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitTimeBound {
    After(i64),
    Before(i64),
    Between { since: i64, until: i64 },
}

impl CommitTimeBound {
    pub fn evaluate(&self, commit_time: i64) -> FilterOutcome {
        match *self {
            CommitTimeBound::After(since) if commit_time < since => FilterOutcome::ExcludeAndStop,
            CommitTimeBound::After(_) => FilterOutcome::Include,
            CommitTimeBound::Before(until) => FilterOutcome::from_bool(commit_time <= until),
            CommitTimeBound::Between { since, .. } if commit_time < since => {
                FilterOutcome::ExcludeAndStop
            }
            CommitTimeBound::Between { until, .. } => FilterOutcome::from_bool(commit_time <= until),
        }
    }
}

/// Regex search over the full commit message
#[derive(Debug, Clone)]
pub struct MessageFilter {
    regex: Regex,
}

impl MessageFilter {
    pub fn create(pattern: &str, case_insensitive: bool) -> WalkResult<Self> {
        if pattern.is_empty() {
            return Err(WalkError::invalid_pattern(pattern, "cannot match on empty string"));
        }

        RegexBuilder::new(pattern)
            .case_insensitive(case_insensitive)
            .multi_line(true)
            .build()
            .map(|regex| MessageFilter { regex })
            .map_err(|err| WalkError::invalid_pattern(pattern, err.to_string()))
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    pub fn matches(&self, message: &str) -> bool {
        self.regex.is_match(message)
    }
}

#[derive(Debug, Clone, Default)]
pub enum RevFilter {
    /// Every commit
    #[default]
    All,
    /// No commit; stops the walk at the first candidate
    None,
    Not(Box<RevFilter>),
    And(Box<RevFilter>, Box<RevFilter>),
    Or(Box<RevFilter>, Box<RevFilter>),
    /// Commits with at most one parent
    NoMerges,
    CommitTime(CommitTimeBound),
    Message(MessageFilter),
    Pickaxe(PickaxeFilter),
    /// The first `limit` commits offered, then stop
    MaxCount { limit: usize, seen: usize },
    /// Drop the first `skip` commits offered
    Skip { skip: usize, seen: usize },
}

impl RevFilter {
    pub fn not(filter: RevFilter) -> Self {
        RevFilter::Not(Box::new(filter))
    }

    pub fn and(left: RevFilter, right: RevFilter) -> Self {
        RevFilter::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: RevFilter, right: RevFilter) -> Self {
        RevFilter::Or(Box::new(left), Box::new(right))
    }

    /// Conjunction of all filters, left to right; `ALL` when empty.
    pub fn and_all(filters: impl IntoIterator<Item = RevFilter>) -> Self {
        filters
            .into_iter()
            .reduce(RevFilter::and)
            .unwrap_or(RevFilter::All)
    }

    pub fn commit_time_after(since: i64) -> Self {
        RevFilter::CommitTime(CommitTimeBound::After(since))
    }

    pub fn commit_time_before(until: i64) -> Self {
        RevFilter::CommitTime(CommitTimeBound::Before(until))
    }

    pub fn commit_time_between(since: i64, until: i64) -> Self {
        RevFilter::CommitTime(CommitTimeBound::Between { since, until })
    }

    pub fn message(pattern: &str, case_insensitive: bool) -> WalkResult<Self> {
        Ok(RevFilter::Message(MessageFilter::create(pattern, case_insensitive)?))
    }

    pub fn pickaxe(pattern: &str, use_regex: bool) -> WalkResult<Self> {
        Ok(RevFilter::Pickaxe(PickaxeFilter::create(pattern, use_regex)?))
    }

    pub fn max_count(limit: usize) -> Self {
        RevFilter::MaxCount { limit, seen: 0 }
    }

    pub fn skip(skip: usize) -> Self {
        RevFilter::Skip { skip, seen: 0 }
    }

    pub fn include(&mut self, graph: &CommitGraph, commit: &CommitNode) -> WalkResult<FilterOutcome> {
        let outcome = match self {
            RevFilter::All => FilterOutcome::Include,
            RevFilter::None => FilterOutcome::ExcludeAndStop,
            RevFilter::Not(inner) => match inner.include(graph, commit)? {
                FilterOutcome::Include => FilterOutcome::Exclude,
                FilterOutcome::Exclude | FilterOutcome::ExcludeAndStop => FilterOutcome::Include,
            },
            RevFilter::And(left, right) => match left.include(graph, commit)? {
                FilterOutcome::Include => right.include(graph, commit)?,
                rejected => rejected,
            },
            RevFilter::Or(left, right) => match left.include(graph, commit)? {
                FilterOutcome::Include => FilterOutcome::Include,
                first => match right.include(graph, commit)? {
                    FilterOutcome::Include => FilterOutcome::Include,
                    FilterOutcome::ExcludeAndStop if first.is_stop() => FilterOutcome::ExcludeAndStop,
                    _ => FilterOutcome::Exclude,
                },
            },
            RevFilter::NoMerges => FilterOutcome::from_bool(!commit.is_merge()),
            RevFilter::CommitTime(bound) => bound.evaluate(commit.commit_time()),
            RevFilter::Message(filter) => FilterOutcome::from_bool(filter.matches(&graph.body(commit)?)),
            RevFilter::Pickaxe(filter) => FilterOutcome::from_bool(filter.include(graph, commit)?),
            RevFilter::MaxCount { limit, seen } => {
                if *seen >= *limit {
                    FilterOutcome::ExcludeAndStop
                } else {
                    *seen += 1;
                    FilterOutcome::Include
                }
            }
            RevFilter::Skip { skip, seen } => {
                if *seen < *skip {
                    *seen += 1;
                    FilterOutcome::Exclude
                } else {
                    FilterOutcome::Include
                }
            }
        };

        Ok(outcome)
    }

    /// Whether evaluation reads the commit message.
    pub fn requires_commit_body(&self) -> bool {
        match self {
            RevFilter::Message(_) => true,
            RevFilter::Not(inner) => inner.requires_commit_body(),
            RevFilter::And(left, right) | RevFilter::Or(left, right) => {
                left.requires_commit_body() || right.requires_commit_body()
            }
            _ => false,
        }
    }

    /// Equivalent filter with all per-walk counters reset.
    pub fn duplicate(&self) -> Self {
        match self {
            RevFilter::Not(inner) => RevFilter::not(inner.duplicate()),
            RevFilter::And(left, right) => RevFilter::and(left.duplicate(), right.duplicate()),
            RevFilter::Or(left, right) => RevFilter::or(left.duplicate(), right.duplicate()),
            RevFilter::MaxCount { limit, .. } => RevFilter::max_count(*limit),
            RevFilter::Skip { skip, .. } => RevFilter::skip(*skip),
            stateless => stateless.clone(),
        }
    }
}

impl fmt::Display for RevFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RevFilter::All => write!(f, "ALL"),
            RevFilter::None => write!(f, "NONE"),
            RevFilter::Not(inner) => write!(f, "NOT {inner}"),
            RevFilter::And(left, right) => write!(f, "({left} AND {right})"),
            RevFilter::Or(left, right) => write!(f, "({left} OR {right})"),
            RevFilter::NoMerges => write!(f, "NO_MERGES"),
            RevFilter::CommitTime(CommitTimeBound::After(since)) => write!(f, "COMMIT_TIME({since}..)"),
            RevFilter::CommitTime(CommitTimeBound::Before(until)) => write!(f, "COMMIT_TIME(..{until})"),
            RevFilter::CommitTime(CommitTimeBound::Between { since, until }) => {
                write!(f, "COMMIT_TIME({since}..{until})")
            }
            RevFilter::Message(filter) => write!(f, "MESSAGE({:?})", filter.pattern()),
            RevFilter::Pickaxe(filter) => write!(f, "PICKAXE({:?})", filter.pattern()),
            RevFilter::MaxCount { limit, .. } => write!(f, "MAX_COUNT({limit})"),
            RevFilter::Skip { skip, .. } => write!(f, "SKIP({skip})"),
        }
    }
}
