use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::branch::{ANCESTOR, EXCLUDE_PREFIX, PARENT, RANGE_SEPARATOR, REF_ALIASES};
use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::WalkError;
use anyhow::Context;
use std::fmt;

/// A single revision expression naming one commit.
///
/// Supports:
/// - Ref names: `main`, `feature/new-feature`, `HEAD`
/// - Aliases: `@` (resolves to `HEAD`)
/// - Full or abbreviated (4+ hex characters) object ids, tried when no ref matches
/// - Parent notation: `<revision>^`
/// - Ancestor notation: `<revision>~<n>` (first parents only)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Revision {
    Ref(BranchName),
    Parent(Box<Revision>),
    Ancestor(Box<Revision>, usize),
}

impl Revision {
    pub fn head() -> Self {
        Revision::Ref(BranchName::head())
    }

    pub fn try_parse(revision: &str) -> anyhow::Result<Revision> {
        if let Some(caps) = PARENT.captures(revision) {
            let base_revision = Self::try_parse(&caps[1])?;

            Ok(Revision::Parent(Box::new(base_revision)))
        } else if let Some(caps) = ANCESTOR.captures(revision) {
            let generations: usize = caps[2]
                .parse()
                .with_context(|| format!("failed to parse generations in revision: {revision}"))?;
            let base_revision = Self::try_parse(&caps[1])?;

            Ok(Revision::Ancestor(Box::new(base_revision), generations))
        } else {
            let resolved_name = *REF_ALIASES.get(revision).unwrap_or(&revision);
            let branch_name = BranchName::try_parse(resolved_name.to_string())
                .map_err(|_| WalkError::InvalidRevision(revision.to_string()))?;

            Ok(Revision::Ref(branch_name))
        }
    }

    /// Resolve to a commit id. Refs win over object ids when both could match.
    pub fn resolve(&self, repository: &Repository) -> anyhow::Result<ObjectId> {
        match self {
            Revision::Ref(name) => match repository.refs().read_ref(name.as_ref())? {
                Some(oid) => Ok(oid),
                None if Self::looks_like_oid(name.as_ref()) => {
                    Self::resolve_oid(name.as_ref(), repository)
                }
                None => Err(WalkError::InvalidRevision(name.to_string()).into()),
            },
            Revision::Parent(base) => {
                let oid = base.resolve(repository)?;
                Self::first_parent(oid, repository, self)
            }
            Revision::Ancestor(base, generations) => {
                let mut oid = base.resolve(repository)?;
                for _ in 0..*generations {
                    oid = Self::first_parent(oid, repository, self)?;
                }

                Ok(oid)
            }
        }
    }

    fn first_parent(
        oid: ObjectId,
        repository: &Repository,
        revision: &Revision,
    ) -> anyhow::Result<ObjectId> {
        let node = repository.graph().resolve(&oid)?;

        node.parents()
            .first()
            .copied()
            .ok_or_else(|| WalkError::InvalidRevision(revision.to_string()).into())
    }

    fn resolve_oid(oid_str: &str, repository: &Repository) -> anyhow::Result<ObjectId> {
        if oid_str.len() == OBJECT_ID_LENGTH {
            return ObjectId::try_parse(oid_str);
        }

        let matches = repository.database().find_objects_by_prefix(oid_str)?;
        let commit_matches = matches
            .iter()
            .filter(|oid| {
                repository
                    .database()
                    .object_type(oid)
                    .is_ok_and(|object_type| object_type == ObjectType::Commit)
            })
            .collect::<Vec<_>>();

        match commit_matches.as_slice() {
            [] => Err(WalkError::InvalidRevision(oid_str.to_string()).into()),
            [oid] => Ok(**oid),
            candidates => {
                let mut error_msg = format!("short SHA1 {oid_str} is ambiguous\nhint: The candidates are:");
                for oid in candidates {
                    error_msg.push_str(&format!("\nhint:   {} commit", oid.to_short_oid()));
                }
                anyhow::bail!(error_msg)
            }
        }
    }

    fn looks_like_oid(s: &str) -> bool {
        // Must be at least 4 characters (minimum prefix length for Git)
        // and contain only hex digits
        s.len() >= 4 && s.len() <= OBJECT_ID_LENGTH && s.chars().all(|c| c.is_ascii_hexdigit())
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Revision::Ref(name) => write!(f, "{name}"),
            Revision::Parent(base) => write!(f, "{base}^"),
            Revision::Ancestor(base, generations) => write!(f, "{base}~{generations}"),
        }
    }
}

/// One revision argument of `log`: a start point, an exclusion or a range
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevisionArg {
    Include(Revision),
    /// `^rev`: hide `rev` and its ancestors
    Exclude(Revision),
    /// `a..b`: commits reachable from `b` but not from `a`; either side defaults to HEAD
    Range { from: Revision, to: Revision },
}

impl RevisionArg {
    pub fn try_parse(arg: &str) -> anyhow::Result<Self> {
        if let Some(excluded) = arg.strip_prefix(EXCLUDE_PREFIX) {
            return Ok(RevisionArg::Exclude(Revision::try_parse(excluded)?));
        }

        if let Some((from, to)) = arg.split_once(RANGE_SEPARATOR) {
            let side = |text: &str| {
                if text.is_empty() {
                    Ok(Revision::head())
                } else {
                    Revision::try_parse(text)
                }
            };

            return Ok(RevisionArg::Range {
                from: side(from)?,
                to: side(to)?,
            });
        }

        Ok(RevisionArg::Include(Revision::try_parse(arg)?))
    }
}
