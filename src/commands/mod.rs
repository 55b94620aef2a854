//! Command implementations
//!
//! Commands are `impl Repository` blocks so the binary only has to open a
//! repository and dispatch.
//!
//! - `porcelain`: User-facing commands (`init`, `log`)

pub mod porcelain;
