//! Arena-backed virtual file tree.
//!
//! Nodes live in a flat id-indexed map and refer to each other by [`NodeId`]. Every structural
//! edit goes through [`VirtualFileTree::insert_child`] or [`VirtualFileTree::delete_item`], which
//! update the child and parent sides together, so the tree invariant holds after each call.
//!
//! The map sits behind an [`Arc`]; [`VirtualFileTree::node_map`] hands out a cheap immutable
//! snapshot and later edits copy-on-write instead of touching what a reader holds.

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Arc,
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    path::{join_virtual_path, names_match, virtual_path_segments},
    types::{FsError, FsNode, FsNodeBody, NodeId, ROOT_NAME},
};
use crate::time::next_monotonic_timestamp_ms;

/// Immutable node map shared between a tree and its snapshots.
pub type FsNodeMap = Arc<BTreeMap<NodeId, FsNode>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Rooted tree of file and folder nodes held in memory for one session.
pub struct VirtualFileTree {
    next_node_id: u64,
    nodes: FsNodeMap,
}

impl Default for VirtualFileTree {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualFileTree {
    /// Creates a tree holding only the root folder.
    pub fn new() -> Self {
        let now = next_monotonic_timestamp_ms();
        let root = FsNode {
            id: NodeId::ROOT,
            name: ROOT_NAME.to_string(),
            parent: None,
            created_at_unix_ms: now,
            modified_at_unix_ms: now,
            body: FsNodeBody::folder(),
        };
        Self {
            next_node_id: NodeId::ROOT.0 + 1,
            nodes: Arc::new(BTreeMap::from([(NodeId::ROOT, root)])),
        }
    }

    /// Returns a snapshot of the node map. Later edits to the tree do not affect it.
    pub fn node_map(&self) -> FsNodeMap {
        Arc::clone(&self.nodes)
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: the root is never removed.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Looks up a node by id.
    pub fn get_item(&self, id: NodeId) -> Option<&FsNode> {
        self.nodes.get(&id)
    }

    /// Returns the child nodes of the folder at `path`, in child order.
    ///
    /// Yields an empty list when a segment does not resolve or the path names a file.
    pub fn get_items_by_path(&self, path: &str) -> Vec<&FsNode> {
        match self.resolve(path) {
            Some(node) if node.is_folder() => self.children_of(node),
            _ => Vec::new(),
        }
    }

    /// Resolves `path` to the id of the node it names, or `None` when any segment is missing.
    pub fn find_item_id_by_path(&self, path: &str) -> Option<NodeId> {
        self.resolve(path).map(|node| node.id)
    }

    /// Builds the absolute display path of a node (`/` for the root).
    pub fn path_of(&self, id: NodeId) -> Option<String> {
        let mut names = Vec::new();
        let mut current = self.nodes.get(&id)?;
        while let Some(parent) = current.parent {
            if names.len() > self.nodes.len() {
                return None;
            }
            names.push(current.name.as_str());
            current = self.nodes.get(&parent)?;
        }
        Some(
            names
                .into_iter()
                .rev()
                .fold(ROOT_NAME.to_string(), |path, name| join_virtual_path(&path, name)),
        )
    }

    /// Creates a file as the last child of `parent` and returns its id.
    ///
    /// # Errors
    ///
    /// Fails without mutating the tree when `parent` is not an existing folder, the name is
    /// invalid, or a sibling already uses the name.
    pub fn create_file(
        &mut self,
        name: impl Into<String>,
        content: impl Into<String>,
        parent: NodeId,
    ) -> Result<NodeId, FsError> {
        self.insert_child(parent, name.into(), FsNodeBody::file(content))
    }

    /// Creates an empty folder as the last child of `parent` and returns its id.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Self::create_file`].
    pub fn create_folder(
        &mut self,
        name: impl Into<String>,
        parent: NodeId,
    ) -> Result<NodeId, FsError> {
        self.insert_child(parent, name.into(), FsNodeBody::folder())
    }

    /// Replaces a file's content, recomputing its size and touching `modified`.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::NotFound`] for unknown ids and [`FsError::NotAFile`] for folders.
    pub fn update_file_content(
        &mut self,
        id: NodeId,
        content: impl Into<String>,
    ) -> Result<(), FsError> {
        match self.nodes.get(&id) {
            None => return Err(FsError::NotFound(id)),
            Some(node) if node.is_folder() => return Err(FsError::NotAFile(id)),
            Some(_) => {}
        }

        let now = next_monotonic_timestamp_ms();
        if let Some(node) = Arc::make_mut(&mut self.nodes).get_mut(&id) {
            node.body = FsNodeBody::file(content);
            node.modified_at_unix_ms = now;
        }
        Ok(())
    }

    /// Deletes a node and, for folders, its whole subtree.
    ///
    /// The node is detached from its parent (whose `modified` is touched) and every removed id is
    /// returned in depth-first pre-order, starting with `id` itself. All checks run before the
    /// first write, so the tree is never left half-deleted.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::NotFound`] for unknown ids and [`FsError::RootImmutable`] for the root.
    pub fn delete_item(&mut self, id: NodeId) -> Result<Vec<NodeId>, FsError> {
        if id.is_root() {
            return Err(FsError::RootImmutable);
        }
        let parent = self.nodes.get(&id).ok_or(FsError::NotFound(id))?.parent;
        let doomed = self.subtree_ids(id);

        let now = next_monotonic_timestamp_ms();
        let nodes = Arc::make_mut(&mut self.nodes);
        if let Some(parent_id) = parent {
            if let Some(FsNode {
                body: FsNodeBody::Folder { children },
                modified_at_unix_ms,
                ..
            }) = nodes.get_mut(&parent_id)
            {
                children.retain(|child| *child != id);
                *modified_at_unix_ms = now;
            }
        }
        for doomed_id in doomed.iter().rev() {
            nodes.remove(doomed_id);
        }

        debug!(node = %id, removed = doomed.len(), "deleted file tree item");
        Ok(doomed)
    }

    /// Verifies the rooted-tree invariant.
    ///
    /// Checks that the root exists without a parent, that every folder's children point back at
    /// it, that every non-root node is listed exactly once by its parent, and that every node is
    /// reachable from the root (which also rules out cycles).
    ///
    /// # Errors
    ///
    /// Returns [`FsError::Inconsistent`] describing the first violation found.
    pub fn check_consistency(&self) -> Result<(), FsError> {
        let inconsistent = |node: NodeId, reason: &str| FsError::Inconsistent {
            node,
            reason: reason.to_string(),
        };

        let root = self
            .nodes
            .get(&NodeId::ROOT)
            .ok_or_else(|| inconsistent(NodeId::ROOT, "root is missing"))?;
        if root.parent.is_some() || !root.is_folder() {
            return Err(inconsistent(NodeId::ROOT, "root must be a parentless folder"));
        }

        for (id, node) in self.nodes.iter() {
            if node.id != *id {
                return Err(inconsistent(*id, "stored under a different id"));
            }
            if let Some(children) = node.children() {
                for child in children {
                    match self.nodes.get(child) {
                        Some(child_node) if child_node.parent == Some(*id) => {}
                        Some(_) => return Err(inconsistent(*child, "child points at another parent")),
                        None => return Err(inconsistent(*child, "listed child is missing")),
                    }
                }
            }
            if id.is_root() {
                continue;
            }
            let parent = node
                .parent
                .ok_or_else(|| inconsistent(*id, "non-root node without parent"))?;
            let listed = self
                .nodes
                .get(&parent)
                .and_then(FsNode::children)
                .map(|children| children.iter().filter(|child| *child == id).count())
                .unwrap_or(0);
            if listed != 1 {
                return Err(inconsistent(*id, "not listed exactly once by its parent"));
            }
        }

        if self.subtree_ids(NodeId::ROOT).len() != self.nodes.len() {
            return Err(inconsistent(NodeId::ROOT, "nodes unreachable from root"));
        }
        Ok(())
    }

    fn insert_child(
        &mut self,
        parent: NodeId,
        name: String,
        body: FsNodeBody,
    ) -> Result<NodeId, FsError> {
        validate_name(&name)?;
        {
            let parent_node = self
                .nodes
                .get(&parent)
                .filter(|node| node.is_folder())
                .ok_or(FsError::InvalidParent(parent))?;
            if self.child_named(parent_node, &name).is_some() {
                return Err(FsError::NameConflict { parent, name });
            }
        }

        let id = NodeId(self.next_node_id);
        self.next_node_id = self.next_node_id.saturating_add(1);
        let now = next_monotonic_timestamp_ms();
        let nodes = Arc::make_mut(&mut self.nodes);
        if let Some(FsNode {
            body: FsNodeBody::Folder { children },
            modified_at_unix_ms,
            ..
        }) = nodes.get_mut(&parent)
        {
            children.push(id);
            *modified_at_unix_ms = now;
        }
        debug!(node = %id, parent = %parent, name = %name, "created file tree item");
        nodes.insert(
            id,
            FsNode {
                id,
                name,
                parent: Some(parent),
                created_at_unix_ms: now,
                modified_at_unix_ms: now,
                body,
            },
        );
        Ok(id)
    }

    fn resolve(&self, path: &str) -> Option<&FsNode> {
        let mut current = self.nodes.get(&NodeId::ROOT)?;
        for segment in virtual_path_segments(path) {
            current = self.child_named(current, &segment)?;
        }
        Some(current)
    }

    fn child_named<'a>(&'a self, folder: &FsNode, name: &str) -> Option<&'a FsNode> {
        folder
            .children()?
            .iter()
            .filter_map(|child| self.nodes.get(child))
            .find(|child| names_match(&child.name, name))
    }

    fn children_of(&self, folder: &FsNode) -> Vec<&FsNode> {
        folder
            .children()
            .unwrap_or_default()
            .iter()
            .filter_map(|child| self.nodes.get(child))
            .collect()
    }

    fn subtree_ids(&self, id: NodeId) -> Vec<NodeId> {
        let mut seen = BTreeSet::new();
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if !seen.insert(next) {
                continue;
            }
            out.push(next);
            if let Some(children) = self.nodes.get(&next).and_then(FsNode::children) {
                stack.extend(children.iter().rev().copied());
            }
        }
        out
    }
}

fn validate_name(name: &str) -> Result<(), FsError> {
    let invalid = name.trim().is_empty()
        || name.trim() != name
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\');
    if invalid {
        Err(FsError::InvalidName(name.to_string()))
    } else {
        Ok(())
    }
}
