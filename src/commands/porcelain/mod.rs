//! Porcelain commands
//!
//! - `init`: Initialize a new repository
//! - `log`: Walk and print commit history, optionally filtered

pub mod init;
pub mod log;
