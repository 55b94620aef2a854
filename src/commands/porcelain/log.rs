use crate::areas::refs::HEAD_REF_NAME;
use crate::areas::repository::Repository;
use crate::artifacts::branch::revision::RevisionArg;
use crate::artifacts::log::commit_graph::CommitNode;
use crate::artifacts::log::pickaxe::{PickaxeFilter, PickaxeOptions};
use crate::artifacts::log::rev_filter::RevFilter;
use crate::artifacts::log::rev_walk::{RevSort, RevWalk};
use crate::artifacts::objects::commit::Commit;
use crate::errors::{WalkError, WalkResult};
use anyhow::Context;
use colored::Colorize;
use std::io::Write;

#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    /// `<rev>`, `^<rev>` or `<a>..<b>`; HEAD when no start point is given
    pub revisions: Vec<String>,
    pub pickaxe: Option<PickaxeOptions>,
    pub grep: Option<String>,
    pub regexp_ignore_case: bool,
    pub no_merges: bool,
    pub since: Option<i64>,
    pub until: Option<i64>,
    pub max_count: Option<usize>,
    pub skip: Option<usize>,
    pub topo_order: bool,
    pub reverse: bool,
    pub oneline: bool,
    pub abbrev_commit: bool,
}

impl LogOptions {
    /// Conjunction of every requested filter.
    ///
    /// Paging comes last so `--skip` and `-n` only count commits the other
    /// filters already accepted.
    pub fn build_filter(&self) -> WalkResult<RevFilter> {
        let mut filters = Vec::new();

        match (self.since, self.until) {
            (Some(since), Some(until)) => filters.push(RevFilter::commit_time_between(since, until)),
            (Some(since), None) => filters.push(RevFilter::commit_time_after(since)),
            (None, Some(until)) => filters.push(RevFilter::commit_time_before(until)),
            (None, None) => {}
        }
        if self.no_merges {
            filters.push(RevFilter::NoMerges);
        }
        if let Some(grep) = &self.grep {
            filters.push(RevFilter::message(grep, self.regexp_ignore_case)?);
        }
        if let Some(pickaxe) = &self.pickaxe {
            filters.push(RevFilter::Pickaxe(PickaxeFilter::from_options(pickaxe)?));
        }
        if let Some(skip) = self.skip {
            filters.push(RevFilter::skip(skip));
        }
        if let Some(max_count) = self.max_count {
            filters.push(RevFilter::max_count(max_count));
        }

        Ok(RevFilter::and_all(filters))
    }

    pub fn sort(&self) -> RevSort {
        let mut sort = RevSort::empty();
        sort.set(RevSort::TOPO, self.topo_order);
        sort.set(RevSort::REVERSE, self.reverse);

        sort
    }
}

/// Parse a `--since`/`--until` value into unix seconds.
///
/// Accepts raw seconds, RFC 2822, `%Y-%m-%d %H:%M:%S %z` and `%Y-%m-%d`
/// (midnight UTC).
pub fn parse_date(value: &str) -> anyhow::Result<i64> {
    let value = value.trim();

    if let Ok(seconds) = value.parse::<i64>() {
        return Ok(seconds);
    }
    if let Ok(date) = chrono::DateTime::parse_from_rfc2822(value) {
        return Ok(date.timestamp());
    }
    if let Ok(date) = chrono::DateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S %z") {
        return Ok(date.timestamp());
    }
    if let Ok(date) = chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        let midnight = date
            .and_hms_opt(0, 0, 0)
            .with_context(|| format!("invalid date '{value}'"))?;
        return Ok(midnight.and_utc().timestamp());
    }

    anyhow::bail!("invalid date '{value}'")
}

impl Repository {
    pub fn log(&self, options: &LogOptions) -> anyhow::Result<()> {
        let mut walk = RevWalk::new(self.graph().clone());
        walk.set_filter(options.build_filter()?)?;
        walk.set_sort(options.sort())?;
        self.mark_revisions(&mut walk, &options.revisions)?;

        let mut shown = 0usize;
        while let Some(node) = walk.next()? {
            if options.oneline {
                self.show_commit_oneline(&node, options.abbrev_commit)?;
            } else {
                if shown > 0 {
                    writeln!(self.writer())?;
                }
                self.show_commit_medium(&node, options.abbrev_commit)?;
            }
            shown += 1;
        }

        tracing::info!(shown, "log finished");
        Ok(())
    }

    fn mark_revisions(&self, walk: &mut RevWalk, revisions: &[String]) -> anyhow::Result<()> {
        let mut has_start = false;

        for revision in revisions {
            match RevisionArg::try_parse(revision)? {
                RevisionArg::Include(revision) => {
                    walk.mark_start(&revision.resolve(self)?)?;
                    has_start = true;
                }
                RevisionArg::Exclude(revision) => {
                    walk.mark_uninteresting(&revision.resolve(self)?)?;
                }
                RevisionArg::Range { from, to } => {
                    walk.mark_uninteresting(&from.resolve(self)?)?;
                    walk.mark_start(&to.resolve(self)?)?;
                    has_start = true;
                }
            }
        }

        if !has_start {
            let head = self
                .refs()
                .read_head()?
                .ok_or_else(|| WalkError::InvalidRevision(HEAD_REF_NAME.to_string()))?;
            walk.mark_start(&head)?;
        }

        Ok(())
    }

    fn show_commit_medium(&self, node: &CommitNode, abbrev_commit: bool) -> anyhow::Result<()> {
        let commit = self.database().parse_object_as_commit(node.id())?;

        writeln!(
            self.writer(),
            "{}",
            format!("commit {}", Self::abbrev_commit_id(node, abbrev_commit))
                .as_str()
                .yellow()
        )?;
        writeln!(self.writer(), "Author: {}", commit.author().display_name())?;
        writeln!(
            self.writer(),
            "Date:   {}",
            commit.author().readable_timestamp()
        )?;
        writeln!(self.writer())?;
        for message_line in commit.message().lines() {
            writeln!(self.writer(), "    {message_line}")?;
        }

        Ok(())
    }

    fn show_commit_oneline(&self, node: &CommitNode, abbrev_commit: bool) -> anyhow::Result<()> {
        let commit: Commit = self.database().parse_object_as_commit(node.id())?;

        writeln!(
            self.writer(),
            "{} {}",
            Self::abbrev_commit_id(node, abbrev_commit).as_str().yellow(),
            commit.short_message()
        )?;

        Ok(())
    }

    fn abbrev_commit_id(node: &CommitNode, abbrev_commit: bool) -> String {
        if abbrev_commit {
            node.id().to_short_oid()
        } else {
            node.id().to_string()
        }
    }
}
