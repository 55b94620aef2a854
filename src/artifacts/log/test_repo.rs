//! In-memory history builder for unit tests

use crate::areas::database::Database;
use crate::artifacts::log::commit_graph::CommitGraph;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::{Author, Commit};
use crate::artifacts::objects::entry_mode::EntryMode;
use crate::artifacts::objects::object::{Object, Packable, frame};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use bytes::Bytes;
use chrono::TimeZone;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Seconds between commits created with [`TestRepo::commit`]
pub const TICK: i64 = 100;
const EPOCH: i64 = 1_640_995_200; // 2022-01-01

/// Object stored byte for byte, for types and payloads the model does not build
pub struct RawObject {
    object_type: ObjectType,
    content: String,
}

impl Packable for RawObject {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        Ok(frame(self.object_type, self.content.as_bytes()))
    }
}

impl Object for RawObject {
    fn object_type(&self) -> ObjectType {
        self.object_type
    }
}

pub struct TestRepo {
    database: Arc<Database>,
    clock: i64,
}

impl TestRepo {
    pub fn new() -> Self {
        TestRepo {
            database: Arc::new(Database::in_memory()),
            clock: EPOCH,
        }
    }

    pub fn database(&self) -> Arc<Database> {
        self.database.clone()
    }

    pub fn graph(&self) -> Arc<CommitGraph> {
        Arc::new(CommitGraph::new(self.database.clone()))
    }

    pub fn now(&self) -> i64 {
        self.clock
    }

    pub fn blob(&self, content: &str) -> ObjectId {
        self.database.store(&Blob::from(content)).unwrap()
    }

    /// Store a tree from `path -> content` pairs; `/` in a path nests directories.
    pub fn tree(&self, files: &[(&str, &str)]) -> ObjectId {
        let mut root = BTreeMap::<String, Vec<(String, String)>>::new();
        let mut flat = Tree::new();

        for (path, content) in files {
            match path.split_once('/') {
                Some((dir, rest)) => root
                    .entry(dir.to_string())
                    .or_default()
                    .push((rest.to_string(), content.to_string())),
                None => flat = flat.with_entry(*path, self.blob(content), EntryMode::Regular),
            }
        }

        for (dir, children) in root {
            let children = children
                .iter()
                .map(|(path, content)| (path.as_str(), content.as_str()))
                .collect::<Vec<_>>();
            flat = flat.with_entry(dir, self.tree(&children), EntryMode::Directory);
        }

        self.database.store(&flat).unwrap()
    }

    /// Commit `files` as the complete snapshot, one tick after the previous commit.
    pub fn commit(&mut self, files: &[(&str, &str)], parents: &[ObjectId]) -> ObjectId {
        self.clock += TICK;
        self.commit_at(self.clock, files, parents, "commit")
    }

    pub fn commit_at(
        &self,
        seconds: i64,
        files: &[(&str, &str)],
        parents: &[ObjectId],
        message: &str,
    ) -> ObjectId {
        let timestamp = chrono::FixedOffset::east_opt(0)
            .unwrap()
            .timestamp_opt(seconds, 0)
            .unwrap();
        let author = Author::new_with_timestamp(
            "A U Thor".to_string(),
            "author@example.com".to_string(),
            timestamp,
        );
        let tree = self.tree(files);

        self.database
            .store(&Commit::new(parents.to_vec(), tree, author, message.to_string()))
            .unwrap()
    }

    /// Advance the clock without committing.
    pub fn tick(&mut self, seconds: i64) {
        self.clock += seconds;
    }

    pub fn raw(&self, object_type: ObjectType, content: &str) -> ObjectId {
        self.database
            .store(&RawObject {
                object_type,
                content: content.to_string(),
            })
            .unwrap()
    }
}
