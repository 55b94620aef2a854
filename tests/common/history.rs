use chrono::TimeZone;
use revwalk::areas::database::Database;
use revwalk::areas::refs::Refs;
use revwalk::artifacts::branch::branch_name::{BranchName, SymRefName};
use revwalk::artifacts::objects::blob::Blob;
use revwalk::artifacts::objects::commit::{Author, Commit};
use revwalk::artifacts::objects::entry_mode::EntryMode;
use revwalk::artifacts::objects::object_id::ObjectId;
use revwalk::artifacts::objects::tree::Tree;
use std::collections::BTreeMap;
use std::path::Path;

/// Seconds between commits made with [`History::commit`]
pub const TICK: i64 = 100;
/// 2022-01-01 00:00:00 UTC
pub const EPOCH: i64 = 1_640_995_200;

pub const AUTHOR_NAME: &str = "A U Thor";
pub const AUTHOR_EMAIL: &str = "author@example.com";

/// Writes commits straight into an initialized repository's object database.
pub struct History {
    database: Database,
    refs: Refs,
    clock: i64,
}

impl History {
    pub fn open(dir: &Path) -> Self {
        let git_path = dir.join(".git");

        History {
            database: Database::new(git_path.join("objects").into_boxed_path()),
            refs: Refs::new(git_path.into_boxed_path()),
            clock: EPOCH,
        }
    }

    /// Store a tree from `path -> content` pairs; `/` in a path nests directories.
    pub fn tree(&self, files: &[(&str, &str)]) -> ObjectId {
        let mut dirs = BTreeMap::<String, Vec<(String, String)>>::new();
        let mut tree = Tree::new();

        for (path, content) in files {
            match path.split_once('/') {
                Some((dir, rest)) => dirs
                    .entry(dir.to_string())
                    .or_default()
                    .push((rest.to_string(), content.to_string())),
                None => {
                    let blob = self.database.store(&Blob::from(*content)).unwrap();
                    tree = tree.with_entry(*path, blob, EntryMode::Regular);
                }
            }
        }

        for (dir, children) in dirs {
            let children = children
                .iter()
                .map(|(path, content)| (path.as_str(), content.as_str()))
                .collect::<Vec<_>>();
            tree = tree.with_entry(dir, self.tree(&children), EntryMode::Directory);
        }

        self.database.store(&tree).unwrap()
    }

    /// Commit `files` as the full snapshot, one tick after the previous commit.
    pub fn commit(&mut self, parents: &[ObjectId], files: &[(&str, &str)], message: &str) -> ObjectId {
        self.clock += TICK;
        self.commit_at(self.clock, parents, files, message)
    }

    pub fn commit_at(
        &self,
        seconds: i64,
        parents: &[ObjectId],
        files: &[(&str, &str)],
        message: &str,
    ) -> ObjectId {
        let timestamp = chrono::FixedOffset::east_opt(0)
            .unwrap()
            .timestamp_opt(seconds, 0)
            .unwrap();
        let author = Author::new_with_timestamp(
            AUTHOR_NAME.to_string(),
            AUTHOR_EMAIL.to_string(),
            timestamp,
        );
        let tree = self.tree(files);

        self.database
            .store(&Commit::new(parents.to_vec(), tree, author, message.to_string()))
            .unwrap()
    }

    pub fn now(&self) -> i64 {
        self.clock
    }

    /// Move the branch HEAD points at.
    pub fn update_head(&self, oid: ObjectId) {
        self.refs.update_head(oid).unwrap();
    }

    pub fn update_branch(&self, name: &str, oid: ObjectId) {
        let branch = BranchName::try_parse(name.to_string()).unwrap();
        self.refs
            .update_ref(&SymRefName::for_branch(&branch), oid)
            .unwrap();
    }
}
