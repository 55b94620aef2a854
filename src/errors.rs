//! Error taxonomy for the revision walk
//!
//! Pattern errors surface when a filter is built. Object errors surface during
//! traversal and end the current pass: the walk reports the error once and
//! yields nothing further until it is reset.

use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;

#[derive(Debug, thiserror::Error)]
pub enum WalkError {
    /// Empty pattern, or a regular expression that does not compile.
    #[error("invalid pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("object {0} not found")]
    ObjectMissing(ObjectId),

    #[error("object {id} is a {actual}, expected a {expected}")]
    ObjectTypeMismatch {
        id: ObjectId,
        expected: ObjectType,
        actual: ObjectType,
    },

    #[error("malformed object {id}: {reason}")]
    MalformedObject { id: ObjectId, reason: String },

    #[error("cannot configure a walk that has already started")]
    WalkInProgress,

    #[error("unknown revision {0:?}")]
    InvalidRevision(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl WalkError {
    pub fn invalid_pattern(pattern: &str, reason: impl Into<String>) -> Self {
        WalkError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.into(),
        }
    }

    pub fn malformed(id: &ObjectId, reason: impl std::fmt::Display) -> Self {
        WalkError::MalformedObject {
            id: *id,
            reason: reason.to_string(),
        }
    }
}

pub type WalkResult<T> = Result<T, WalkError>;
