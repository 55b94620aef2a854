//! Git data structures and algorithms
//!
//! - `branch`: Branch names and revision parsing
//! - `database`: Object store seams used by the walk
//! - `diff`: Tree-to-tree diffing
//! - `log`: Commit graph, revision walk, filters and pickaxe
//! - `objects`: Git object types (blob, tree, commit)

pub mod branch;
pub mod database;
pub mod diff;
pub mod log;
pub mod objects;
