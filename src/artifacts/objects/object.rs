use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Result;
use bytes::Bytes;
use sha1::{Digest, Sha1};
use std::io::BufRead;

pub trait Packable {
    fn serialize(&self) -> Result<Bytes>;
}

pub trait Unpackable {
    fn deserialize(reader: impl BufRead) -> Result<Self>
    where
        Self: Sized;
}

pub trait Object: Packable {
    fn object_type(&self) -> ObjectType;

    fn object_id(&self) -> Result<ObjectId> {
        let content = self.serialize()?;
        let mut hasher = Sha1::new();
        hasher.update(&content);

        Ok(ObjectId::from_bytes(hasher.finalize().into()))
    }
}

/// Prefix `content` with the `<type> <size>\0` header.
pub fn frame(object_type: ObjectType, content: &[u8]) -> Bytes {
    let mut framed = format!("{} {}\0", object_type.as_str(), content.len()).into_bytes();
    framed.extend_from_slice(content);
    Bytes::from(framed)
}
