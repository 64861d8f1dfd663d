//! Virtual file tree node model and errors.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Display name of the root folder.
pub const ROOT_NAME: &str = "/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
/// Stable identifier of a node in the virtual file tree. Never reused within a session.
pub struct NodeId(pub u64);

impl NodeId {
    /// Reserved id of the root folder.
    pub const ROOT: NodeId = NodeId(0);

    /// Returns `true` for the reserved root id.
    pub const fn is_root(self) -> bool {
        self.0 == Self::ROOT.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            f.write_str("root")
        } else {
            write!(f, "node-{}", self.0)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Node kind. Fixed at creation.
pub enum FsNodeKind {
    /// Leaf node holding text content.
    File,
    /// Node holding an ordered list of children.
    Folder,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
/// Kind-specific node payload.
pub enum FsNodeBody {
    /// File content and its derived size.
    File {
        /// Free-form text content.
        content: String,
        /// Length of `content` in UTF-16 code units, derived whenever content is written.
        size: u64,
    },
    /// Ordered child ids. Empty folders carry an empty list.
    Folder {
        /// Child ids in creation order.
        children: Vec<NodeId>,
    },
}

impl FsNodeBody {
    /// Builds a file body, deriving `size` from `content`.
    pub fn file(content: impl Into<String>) -> Self {
        let content = content.into();
        Self::File {
            size: content.encode_utf16().count() as u64,
            content,
        }
    }

    /// Builds an empty folder body.
    pub fn folder() -> Self {
        Self::Folder {
            children: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A file or folder in the virtual file tree.
pub struct FsNode {
    /// Node id.
    pub id: NodeId,
    /// Display name, unique among siblings (case-insensitive).
    pub name: String,
    /// Owning folder; `None` only for the root.
    pub parent: Option<NodeId>,
    /// Creation time in unix milliseconds.
    pub created_at_unix_ms: u64,
    /// Last content or child-list change in unix milliseconds.
    pub modified_at_unix_ms: u64,
    /// File content or folder children.
    #[serde(flatten)]
    pub body: FsNodeBody,
}

impl FsNode {
    /// Returns the node kind.
    pub fn kind(&self) -> FsNodeKind {
        match self.body {
            FsNodeBody::File { .. } => FsNodeKind::File,
            FsNodeBody::Folder { .. } => FsNodeKind::Folder,
        }
    }

    /// Returns `true` for folders.
    pub fn is_folder(&self) -> bool {
        matches!(self.body, FsNodeBody::Folder { .. })
    }

    /// File content, `None` for folders.
    pub fn content(&self) -> Option<&str> {
        match &self.body {
            FsNodeBody::File { content, .. } => Some(content),
            FsNodeBody::Folder { .. } => None,
        }
    }

    /// File size in UTF-16 code units, `None` for folders.
    pub fn size(&self) -> Option<u64> {
        match self.body {
            FsNodeBody::File { size, .. } => Some(size),
            FsNodeBody::Folder { .. } => None,
        }
    }

    /// Child ids, `None` for files.
    pub fn children(&self) -> Option<&[NodeId]> {
        match &self.body {
            FsNodeBody::Folder { children } => Some(children),
            FsNodeBody::File { .. } => None,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Errors raised by virtual file tree mutations and integrity checks.
pub enum FsError {
    /// The referenced node does not exist.
    #[error("node `{0}` not found")]
    NotFound(NodeId),
    /// A create targeted a parent that is missing or is not a folder.
    #[error("`{0}` is not an existing folder")]
    InvalidParent(NodeId),
    /// A content write targeted a folder.
    #[error("`{0}` is not a file")]
    NotAFile(NodeId),
    /// A sibling already uses this name (case-insensitive).
    #[error("an item named `{name}` already exists in `{parent}`")]
    NameConflict {
        /// Folder that already holds the name.
        parent: NodeId,
        /// Rejected name.
        name: String,
    },
    /// The name is empty, reserved, or contains a path separator.
    #[error("invalid item name `{0}`")]
    InvalidName(String),
    /// The root folder cannot be deleted.
    #[error("the root folder cannot be deleted")]
    RootImmutable,
    /// The tree violates the parent/children invariant.
    #[error("file tree inconsistent at `{node}`: {reason}")]
    Inconsistent {
        /// First node found in violation.
        node: NodeId,
        /// Human-readable description.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn node_serde_shape_distinguishes_files_and_folders() {
        let file = FsNode {
            id: NodeId(7),
            name: "a.txt".to_string(),
            parent: Some(NodeId::ROOT),
            created_at_unix_ms: 1,
            modified_at_unix_ms: 2,
            body: FsNodeBody::file("hello"),
        };
        let value = serde_json::to_value(&file).expect("serialize");
        assert_eq!(value["type"], json!("file"));
        assert_eq!(value["size"], json!(5));
        assert!(value.get("children").is_none());

        let folder = FsNode {
            body: FsNodeBody::folder(),
            ..file
        };
        let value = serde_json::to_value(&folder).expect("serialize");
        assert_eq!(value["type"], json!("folder"));
        assert_eq!(value["children"], json!([]));
        assert!(value.get("content").is_none());

        let round_trip: FsNode = serde_json::from_value(value).expect("deserialize");
        assert_eq!(round_trip, folder);
    }

    #[test]
    fn node_ids_display_root_specially() {
        assert_eq!(NodeId::ROOT.to_string(), "root");
        assert_eq!(NodeId(12).to_string(), "node-12");
    }
}
