//! Git references (branches and HEAD)
//!
//! References are human-readable names pointing to commits. They can be:
//! - Direct: containing a commit SHA-1
//! - Symbolic: pointing to another reference (e.g., HEAD -> refs/heads/master)
//!
//! ## File Format
//!
//! References are stored as text files containing either:
//! - A 40-character SHA-1 hash (direct reference)
//! - `ref: <path>` for symbolic references
//!
//! Only loose refs are read; `packed-refs` is not consulted.

use crate::artifacts::branch::branch_name::{BranchName, SymRefName};
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use derive_new::new;
use fake::rand;
use regex::Regex;
use std::io::Write;
use std::path::Path;
use std::sync::LazyLock;

/// Git references manager rooted at the git directory (typically `.git`)
#[derive(Debug, new)]
pub struct Refs {
    path: Box<Path>,
}

/// Regex pattern for parsing symbolic references
const SYMREF_REGEX: &str = r"^ref: (.+)$";
static SYMREF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(SYMREF_REGEX).expect("symref pattern compiles"));

/// Name of the HEAD reference
pub const HEAD_REF_NAME: &str = "HEAD";

/// Symbolic ref chains longer than this are treated as cycles
const MAX_SYMREF_DEPTH: usize = 5;

#[derive(Debug, Clone)]
enum SymRefOrOid {
    SymRef { sym_ref_name: SymRefName },
    Oid(ObjectId),
}

impl SymRefOrOid {
    fn read_symref_or_oid(path: &Path) -> anyhow::Result<Option<SymRefOrOid>> {
        if !path.is_file() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read ref file at {}", path.display()))?;
        let content = content.trim();

        if content.is_empty() {
            return Ok(None);
        }

        let symref_match = SYMREF.captures(content);
        if let Some(symref_match) = symref_match {
            Ok(Some(SymRefOrOid::SymRef {
                sym_ref_name: SymRefName::new(symref_match[1].to_string()),
            }))
        } else {
            Ok(Some(SymRefOrOid::Oid(ObjectId::try_parse(content).with_context(
                || format!("invalid ref content in {}", path.display()),
            )?)))
        }
    }
}

impl Refs {
    pub fn read_head(&self) -> anyhow::Result<Option<ObjectId>> {
        self.read_symref(&self.head_path(), 0)
    }

    /// Follow HEAD to the ref it ultimately names (HEAD itself when detached).
    pub fn current_ref(&self) -> anyhow::Result<SymRefName> {
        let mut current = SymRefName::new(HEAD_REF_NAME.to_string());

        for _ in 0..MAX_SYMREF_DEPTH {
            match SymRefOrOid::read_symref_or_oid(&self.path.join(current.as_ref_path()))? {
                Some(SymRefOrOid::SymRef { sym_ref_name }) => current = sym_ref_name,
                Some(SymRefOrOid::Oid(_)) | None => return Ok(current),
            }
        }

        anyhow::bail!("symbolic ref chain from HEAD is too deep")
    }

    /// Resolve a short ref name, searching `.git`, `.git/refs` and `.git/refs/heads`.
    ///
    /// Returns `None` when no such ref exists (or it names an unborn branch).
    pub fn read_ref(&self, name: &str) -> anyhow::Result<Option<ObjectId>> {
        let candidates = [self.path.clone(), self.refs_path(), self.heads_path()];

        match candidates
            .iter()
            .map(|base_path| base_path.join(name))
            .find(|path| path.is_file())
        {
            Some(path) => self.read_symref(&path, 0),
            None => Ok(None),
        }
    }

    pub fn read_branch(&self, branch_name: &BranchName) -> anyhow::Result<Option<ObjectId>> {
        self.read_symref(&self.heads_path().join(branch_name.as_ref()), 0)
    }

    /// Point `sym_ref_name` (e.g. `refs/heads/master`) at `oid`, creating it if needed.
    pub fn update_ref(&self, sym_ref_name: &SymRefName, oid: ObjectId) -> anyhow::Result<()> {
        self.write_ref_file(&self.path.join(sym_ref_name.as_ref_path()), &format!("{oid}\n"))
    }

    /// Move whatever HEAD ultimately points at to `oid`.
    pub fn update_head(&self, oid: ObjectId) -> anyhow::Result<()> {
        let target = self.current_ref()?;
        self.update_ref(&target, oid)
    }

    /// Attach HEAD to a branch.
    pub fn set_head(&self, branch_name: &BranchName) -> anyhow::Result<()> {
        self.write_ref_file(
            &self.head_path(),
            &format!("ref: {}\n", SymRefName::for_branch(branch_name)),
        )
    }

    pub fn detach_head(&self, oid: ObjectId) -> anyhow::Result<()> {
        self.write_ref_file(&self.head_path(), &format!("{oid}\n"))
    }

    fn read_symref(&self, path: &Path, depth: usize) -> anyhow::Result<Option<ObjectId>> {
        if depth > MAX_SYMREF_DEPTH {
            anyhow::bail!("symbolic ref chain at {} is too deep", path.display());
        }

        match SymRefOrOid::read_symref_or_oid(path)? {
            Some(SymRefOrOid::SymRef { sym_ref_name }) => {
                self.read_symref(&self.path.join(sym_ref_name.as_ref_path()), depth + 1)
            }
            Some(SymRefOrOid::Oid(oid)) => Ok(Some(oid)),
            None => Ok(None),
        }
    }

    fn write_ref_file(&self, path: &Path, content: &str) -> anyhow::Result<()> {
        let ref_dir = path
            .parent()
            .with_context(|| format!("invalid ref path {}", path.display()))?;
        std::fs::create_dir_all(ref_dir)
            .with_context(|| format!("failed to create ref directory {}", ref_dir.display()))?;

        // write next to the ref and rename so readers never see a partial ref
        let temp_path = ref_dir.join(format!("tmp-ref-{}", rand::random::<u32>()));
        let mut ref_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .with_context(|| format!("failed to open ref file at {}", temp_path.display()))?;
        ref_file.write_all(content.as_bytes())?;

        std::fs::rename(&temp_path, path)
            .with_context(|| format!("failed to rename ref file to {}", path.display()))?;

        Ok(())
    }

    pub fn head_path(&self) -> Box<Path> {
        self.path.join(HEAD_REF_NAME).into_boxed_path()
    }

    pub fn refs_path(&self) -> Box<Path> {
        self.path.join("refs").into_boxed_path()
    }

    pub fn heads_path(&self) -> Box<Path> {
        self.refs_path().join("heads").into_boxed_path()
    }
}
