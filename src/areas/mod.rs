//! Core repository components
//!
//! - `database`: Object database for storing blobs, trees, and commits
//! - `refs`: Reference management (branches, HEAD)
//! - `repository`: Repository handle tying the database, refs and commit graph together

pub mod database;
pub mod refs;
pub mod repository;
