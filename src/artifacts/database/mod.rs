//! Object database contracts
//!
//! - `database_entry`: A tree entry (object id + mode)
//! - `object_store`: The narrow interfaces the walk consumes: raw content
//!   loading, commit parsing and tree diffing

pub mod database_entry;
pub mod object_store;
