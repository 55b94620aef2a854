//! Revision walking over a git object database.
//!
//! - `areas`: on-disk repository components (object database, refs)
//! - `artifacts`: object types, commit graph, revision walk and its filters
//! - `commands`: the user-facing `init` and `log` commands
//! - `errors`: typed failures surfaced by the walk

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod errors;
