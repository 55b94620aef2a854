//! Reference names and revision expressions
//!
//! - `branch_name`: Validated branch names and symbolic ref paths
//! - `revision`: `rev^`, `rev~n`, `^rev` and `a..b` parsing and resolution

use regex::Regex;
use std::sync::LazyLock;

pub mod branch_name;
pub mod revision;

pub const INVALID_BRANCH_NAME_REGEX: &str =
    r"^\.|\/\.|\.\.|^\/|\/$|\.lock$|@\{|[\x00-\x20\*:\?\[\\~\^\x7f]";
pub const PARENT_REGEX: &str = r"^(.+)\^$";
pub const ANCESTOR_REGEX: &str = r"^(.+)\~(\d+)$";

// Patterns are constant; compiled once on first use.
pub static INVALID_BRANCH_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(INVALID_BRANCH_NAME_REGEX).expect("branch name pattern compiles"));
pub static PARENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PARENT_REGEX).expect("parent pattern compiles"));
pub static ANCESTOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(ANCESTOR_REGEX).expect("ancestor pattern compiles"));
pub const RANGE_SEPARATOR: &str = "..";
pub const EXCLUDE_PREFIX: char = '^';
pub const REF_ALIASES: phf::Map<&'static str, &'static str> = phf::phf_map! {
    "@" => "HEAD",
};
