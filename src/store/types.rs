//! type-safe identifiers and references for the version store.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

/// A content address: the SHA-256 of an object's canonical encoding.
///
/// Rendered and serialized as lowercase hex. The typed wrappers below make
/// sure a snapshot id is never passed where a commit id is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId([u8; 32]);

impl ObjectId {
    /// hash canonical bytes into their content address
    pub(crate) fn digest(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        Self(hasher.finalize().into())
    }

    /// parse an ObjectId from a hex string
    pub fn from_hex(hex_str: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(hex_str)?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| hex::FromHexError::InvalidStringLength)?;
        Ok(Self(arr))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// short form of the id
    pub fn short(&self) -> String {
        self.to_hex()[..7].to_string()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

struct ObjectIdVisitor;

impl Visitor<'_> for ObjectIdVisitor {
    type Value = ObjectId;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a 64-character hex object id")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<ObjectId, E> {
        ObjectId::from_hex(value).map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(ObjectIdVisitor)
    }
}

/// identifies a stored board snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnapshotId(pub(crate) ObjectId);

impl SnapshotId {
    pub(crate) fn new(id: ObjectId) -> Self {
        Self(id)
    }

    pub(crate) fn raw(&self) -> ObjectId {
        self.0
    }

    pub fn short(&self) -> String {
        self.0.short()
    }
}

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// identifies a stored manifest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ManifestId(pub(crate) ObjectId);

impl ManifestId {
    pub(crate) fn new(id: ObjectId) -> Self {
        Self(id)
    }

    pub(crate) fn raw(&self) -> ObjectId {
        self.0
    }

    pub fn short(&self) -> String {
        self.0.short()
    }
}

impl fmt::Display for ManifestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// identifies a stored commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommitId(pub(crate) ObjectId);

impl CommitId {
    pub(crate) fn new(id: ObjectId) -> Self {
        Self(id)
    }

    pub(crate) fn raw(&self) -> ObjectId {
        self.0
    }

    /// parse a CommitId from a hex string
    pub fn from_hex(hex_str: &str) -> Result<Self, hex::FromHexError> {
        ObjectId::from_hex(hex_str).map(Self)
    }

    pub fn short(&self) -> String {
        self.0.short()
    }
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// a validated branch name
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BranchName(String);

impl BranchName {
    /// the default branch name
    pub const MAIN: &'static str = "main";

    /// create a new BranchName
    pub fn new(name: impl Into<String>) -> Result<Self, InvalidBranchName> {
        let name = name.into();
        if name.is_empty() {
            return Err(InvalidBranchName::Empty);
        }
        if name.contains("..") || name.starts_with('/') || name.ends_with('/') {
            return Err(InvalidBranchName::InvalidPath(name));
        }
        if name.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(InvalidBranchName::InvalidPath(name));
        }
        Ok(Self(name))
    }

    /// create the default branch reference
    pub fn main() -> Self {
        Self(Self::MAIN.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BranchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// error type for invalid branch names
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidBranchName {
    Empty,
    InvalidPath(String),
}

impl fmt::Display for InvalidBranchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "branch name cannot be empty"),
            Self::InvalidPath(name) => write!(f, "invalid branch name: '{}'", name),
        }
    }
}

impl std::error::Error for InvalidBranchName {}

/// The HEAD pointer: either attached to a branch (moves commit the branch
/// forward) or detached at a fixed commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Head {
    Symbolic(BranchName),
    Detached(CommitId),
}

impl Head {
    /// the branch HEAD is attached to, if any
    pub fn branch(&self) -> Option<&BranchName> {
        match self {
            Head::Symbolic(branch) => Some(branch),
            Head::Detached(_) => None,
        }
    }

    pub fn is_detached(&self) -> bool {
        matches!(self, Head::Detached(_))
    }
}

impl fmt::Display for Head {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Head::Symbolic(branch) => write!(f, "ref: {}", branch),
            Head::Detached(commit) => write!(f, "detached at {}", commit.short()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_id_hex_roundtrip() {
        let id = ObjectId::digest(b"some canonical bytes");
        let hex_str = id.to_hex();
        assert_eq!(hex_str.len(), 64);
        assert_eq!(ObjectId::from_hex(&hex_str).unwrap(), id);
    }

    #[test]
    fn test_object_id_short() {
        let id = ObjectId::digest(b"x");
        assert_eq!(id.short().len(), 7);
        assert!(id.to_hex().starts_with(&id.short()));
    }

    #[test]
    fn test_object_id_from_hex_invalid() {
        assert!(ObjectId::from_hex("zzzz").is_err());
        assert!(ObjectId::from_hex("abcd").is_err()); // too short
    }

    #[test]
    fn test_object_id_serde_is_hex_string() {
        let id = ObjectId::digest(b"payload");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.to_hex()));

        let back: ObjectId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_digest_is_deterministic() {
        assert_eq!(ObjectId::digest(b"abc"), ObjectId::digest(b"abc"));
        assert_ne!(ObjectId::digest(b"abc"), ObjectId::digest(b"abd"));
    }

    #[test]
    fn test_branch_name_valid() {
        assert!(BranchName::new("main").is_ok());
        assert!(BranchName::new("variation-7").is_ok());
        assert!(BranchName::new("what/if").is_ok());
    }

    #[test]
    fn test_branch_name_invalid() {
        assert!(BranchName::new("").is_err());
        assert!(BranchName::new("a..b").is_err());
        assert!(BranchName::new("/leading").is_err());
        assert!(BranchName::new("trailing/").is_err());
        assert!(BranchName::new("with space").is_err());
    }

    #[test]
    fn test_head_accessors() {
        let symbolic = Head::Symbolic(BranchName::main());
        assert!(!symbolic.is_detached());
        assert_eq!(symbolic.branch(), Some(&BranchName::main()));

        let commit = CommitId::new(ObjectId::digest(b"c"));
        let detached = Head::Detached(commit);
        assert!(detached.is_detached());
        assert_eq!(detached.branch(), None);
    }
}
