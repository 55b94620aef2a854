use crate::artifacts::database::object_store::{CommitParser, ObjectLoader, TreeDiffer};
use crate::artifacts::diff::DiffEntry;
use crate::artifacts::diff::tree_diff::TreeDiff;
use crate::artifacts::objects::commit::{Commit, CommitHeader};
use crate::artifacts::objects::object::{Object, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::{Tree, TreeEntryMap};
use crate::errors::{WalkError, WalkResult};
use anyhow::Context;
use bytes::Bytes;
use fake::rand;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};

#[derive(Debug)]
enum Backend {
    /// Zlib-compressed loose objects under an `objects` directory
    Loose(Box<Path>),
    /// Uncompressed framed objects kept in memory
    Memory(RwLock<HashMap<ObjectId, Bytes>>),
}

/// Content-addressed object database
///
/// Objects are immutable once stored, so concurrent readers never observe a
/// partially written object: loose files are written to a temp name and renamed.
#[derive(Debug)]
pub struct Database {
    backend: Backend,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database {
            backend: Backend::Loose(path),
        }
    }

    pub fn in_memory() -> Self {
        Database {
            backend: Backend::Memory(RwLock::new(HashMap::new())),
        }
    }

    /// Directory holding loose objects; `None` for the in-memory backend.
    pub fn objects_path(&self) -> Option<&Path> {
        match &self.backend {
            Backend::Loose(path) => Some(path),
            Backend::Memory(_) => None,
        }
    }

    pub fn store(&self, object: &impl Object) -> anyhow::Result<ObjectId> {
        let object_id = object.object_id()?;
        let object_content = object.serialize()?;

        match &self.backend {
            Backend::Loose(path) => {
                let object_path = path.join(object_id.to_path());

                // write the object to disk unless it already exists
                if !object_path.exists() {
                    std::fs::create_dir_all(
                        object_path
                            .parent()
                            .context(format!("Invalid object path {}", object_path.display()))?,
                    )
                    .context(format!(
                        "Unable to create object directory {}",
                        object_path.display()
                    ))?;

                    Self::write_object(object_path, object_content)?;
                }
            }
            Backend::Memory(objects) => {
                objects.write().entry(object_id).or_insert(object_content);
            }
        }

        Ok(object_id)
    }

    /// Type and payload (header stripped) of the object.
    pub fn read_object(&self, object_id: &ObjectId) -> WalkResult<(ObjectType, Bytes)> {
        let raw = match &self.backend {
            Backend::Loose(path) => Self::read_loose(path.join(object_id.to_path()), object_id)?,
            Backend::Memory(objects) => objects
                .read()
                .get(object_id)
                .cloned()
                .ok_or(WalkError::ObjectMissing(*object_id))?,
        };

        let mut reader = Cursor::new(&raw);
        let (object_type, size) = ObjectType::parse_object_header(&mut reader)
            .map_err(|err| WalkError::malformed(object_id, err))?;
        let payload = raw.slice(reader.position() as usize..);
        if payload.len() != size {
            return Err(WalkError::malformed(
                object_id,
                format!("declared size {size}, found {}", payload.len()),
            ));
        }

        Ok((object_type, payload))
    }

    pub fn object_type(&self, object_id: &ObjectId) -> WalkResult<ObjectType> {
        Ok(self.read_object(object_id)?.0)
    }

    pub fn contains(&self, object_id: &ObjectId) -> bool {
        match &self.backend {
            Backend::Loose(path) => path.join(object_id.to_path()).is_file(),
            Backend::Memory(objects) => objects.read().contains_key(object_id),
        }
    }

    pub fn parse_object_as_commit(&self, object_id: &ObjectId) -> WalkResult<Commit> {
        let payload = self.read_payload_of(object_id, ObjectType::Commit)?;

        Commit::deserialize(&payload[..]).map_err(|err| WalkError::malformed(object_id, err))
    }

    /// Entries of a tree; a commit id resolves to its root tree.
    pub fn read_tree(&self, object_id: &ObjectId) -> WalkResult<TreeEntryMap> {
        let (object_type, payload) = self.read_object(object_id)?;

        match object_type {
            ObjectType::Tree => Tree::deserialize(&payload[..])
                .map(Tree::into_entries)
                .map_err(|err| WalkError::malformed(object_id, err)),
            ObjectType::Commit => {
                let header = CommitHeader::parse(&payload[..])
                    .map_err(|err| WalkError::malformed(object_id, err))?;
                self.read_tree(&header.tree)
            }
            actual => Err(WalkError::ObjectTypeMismatch {
                id: *object_id,
                expected: ObjectType::Tree,
                actual,
            }),
        }
    }

    /// Find all objects whose hex id starts with the given prefix.
    ///
    /// Used to resolve abbreviated ids. More than one match means the prefix
    /// is ambiguous.
    pub fn find_objects_by_prefix(&self, prefix: &str) -> WalkResult<Vec<ObjectId>> {
        let prefix = prefix.to_ascii_lowercase();

        match &self.backend {
            Backend::Memory(objects) => Ok(objects
                .read()
                .keys()
                .filter(|oid| oid.to_string().starts_with(&prefix))
                .copied()
                .collect()),
            Backend::Loose(path) => {
                let mut matches = Vec::new();
                // With 2+ chars only one fan-out directory can match
                let dir_names = if prefix.len() >= 2 {
                    vec![prefix[..2].to_string()]
                } else {
                    (0..=255u8).map(|i| format!("{i:02x}")).collect()
                };

                for dir_name in dir_names {
                    let dir_path = path.join(&dir_name);
                    if !dir_path.is_dir() {
                        continue;
                    }

                    for entry in std::fs::read_dir(&dir_path)? {
                        let file_name = entry?.file_name();
                        let full_oid = format!("{}{}", dir_name, file_name.to_string_lossy());

                        if full_oid.starts_with(&prefix)
                            && let Ok(oid) = ObjectId::try_parse(&full_oid)
                        {
                            matches.push(oid);
                        }
                    }
                }

                Ok(matches)
            }
        }
    }

    fn read_payload_of(&self, object_id: &ObjectId, expected: ObjectType) -> WalkResult<Bytes> {
        let (actual, payload) = self.read_object(object_id)?;
        if actual != expected {
            return Err(WalkError::ObjectTypeMismatch {
                id: *object_id,
                expected,
                actual,
            });
        }

        Ok(payload)
    }

    fn read_loose(object_path: PathBuf, object_id: &ObjectId) -> WalkResult<Bytes> {
        let object_content = match std::fs::read(&object_path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(WalkError::ObjectMissing(*object_id));
            }
            Err(err) => return Err(err.into()),
        };

        Self::decompress(object_content.into()).map_err(|err| WalkError::malformed(object_id, err))
    }

    fn write_object(object_path: PathBuf, object_content: Bytes) -> anyhow::Result<()> {
        let object_dir = object_path
            .parent()
            .context(format!("Invalid object path {}", object_path.display()))?;
        let temp_object_path = object_dir.join(Self::generate_temp_name());

        let object_content = Self::compress(object_content)?;

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_object_path)
            .context(format!(
                "Unable to open object file {}",
                temp_object_path.display()
            ))?;

        file.write_all(&object_content).context(format!(
            "Unable to write object file {}",
            temp_object_path.display()
        ))?;

        // rename the temp file to the object file to make it atomic
        std::fs::rename(&temp_object_path, &object_path).context(format!(
            "Unable to rename object file to {}",
            object_path.display()
        ))?;

        Ok(())
    }

    fn compress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder
            .write_all(&data)
            .context("Unable to compress object content")?;

        encoder
            .finish()
            .map(|compressed_content| compressed_content.into())
            .context("Unable to finish compressing object content")
    }

    fn decompress(data: Bytes) -> std::io::Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(&*data);
        let mut decompressed_content = Vec::new();
        decoder.read_to_end(&mut decompressed_content)?;

        Ok(decompressed_content.into())
    }

    fn generate_temp_name() -> String {
        format!("tmp-obj-{}", rand::random::<u32>())
    }
}

impl ObjectLoader for Database {
    fn load(&self, id: &ObjectId) -> WalkResult<Bytes> {
        Ok(self.read_object(id)?.1)
    }
}

impl CommitParser for Database {
    fn parse_header(&self, id: &ObjectId) -> WalkResult<CommitHeader> {
        let payload = self.read_payload_of(id, ObjectType::Commit)?;

        CommitHeader::parse(&payload[..]).map_err(|err| WalkError::malformed(id, err))
    }

    fn parse_body(&self, id: &ObjectId) -> WalkResult<String> {
        let payload = self.read_payload_of(id, ObjectType::Commit)?;

        Commit::read_message(&payload[..]).map_err(|err| WalkError::malformed(id, err))
    }
}

impl TreeDiffer for Database {
    fn diff(&self, old_tree: Option<&ObjectId>, new_tree: &ObjectId) -> WalkResult<Vec<DiffEntry>> {
        let mut tree_diff = TreeDiff::new(self);
        tree_diff.compare_oids(old_tree, Some(new_tree), Path::new(""))?;

        Ok(tree_diff.into_entries())
    }
}
