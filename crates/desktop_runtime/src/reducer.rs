//! Reducer actions and transition logic for the desktop store.

use platform_host::{normalize_virtual_path, parent_virtual_path, FsError, NodeId};
use thiserror::Error;

use crate::model::{
    is_folder_path, DesktopState, OpenWindowRequest, WindowId, WindowPosition, WindowSize,
};

#[derive(Debug, Clone, PartialEq)]
/// Actions accepted by [`reduce_desktop`] to mutate [`DesktopState`].
pub enum DesktopAction {
    /// Open a new window on top of the stack.
    OpenWindow(OpenWindowRequest),
    /// Close a window by id.
    CloseWindow {
        /// Window to close.
        window_id: WindowId,
    },
    /// Toggle a window's minimized flag.
    MinimizeWindow {
        /// Window to toggle.
        window_id: WindowId,
    },
    /// Toggle a window's maximized flag.
    MaximizeWindow {
        /// Window to toggle.
        window_id: WindowId,
    },
    /// Raise a window to the top of the stack.
    FocusWindow {
        /// Window to raise.
        window_id: WindowId,
    },
    /// Overwrite a window's position.
    UpdateWindowPosition {
        /// Window to move.
        window_id: WindowId,
        /// New top-left corner.
        position: WindowPosition,
    },
    /// Overwrite a window's size.
    UpdateWindowSize {
        /// Window to resize.
        window_id: WindowId,
        /// New dimensions.
        size: WindowSize,
    },
    /// Create a file as the last child of `parent`.
    CreateFile {
        /// File name.
        name: String,
        /// Initial content.
        content: String,
        /// Folder receiving the file.
        parent: NodeId,
    },
    /// Create an empty folder as the last child of `parent`.
    CreateFolder {
        /// Folder name.
        name: String,
        /// Folder receiving the new folder.
        parent: NodeId,
    },
    /// Replace a file's content (the editor's save).
    UpdateFileContent {
        /// File to overwrite.
        node_id: NodeId,
        /// New content.
        content: String,
    },
    /// Delete a node and its subtree.
    DeleteItem {
        /// Node to delete.
        node_id: NodeId,
    },
    /// Change the current navigation path.
    NavigateTo {
        /// Folder path; normalized before it is stored.
        path: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// What a successfully applied [`DesktopAction`] produced.
pub enum ActionOutcome {
    /// State changed in place.
    Applied,
    /// A window was opened with this id.
    WindowOpened(WindowId),
    /// A file or folder was created with this id.
    NodeCreated(NodeId),
    /// These nodes were removed, in depth-first pre-order.
    NodesDeleted(Vec<NodeId>),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Reducer errors for rejected actions. The state is left untouched when one is returned.
pub enum ReducerError {
    /// The target window id was not found in the current state.
    #[error("window `{0}` not found")]
    WindowNotFound(WindowId),
    /// Navigation target does not name a folder.
    #[error("no such folder: `{0}`")]
    PathNotFound(String),
    /// The file tree rejected the edit.
    #[error(transparent)]
    FileSystem(#[from] FsError),
}

impl ReducerError {
    /// Returns `true` for references to ids that do not exist, which callers treat as no-ops.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::WindowNotFound(_) | Self::FileSystem(FsError::NotFound(_))
        )
    }
}

/// Applies a [`DesktopAction`] to the desktop state.
///
/// This function is the authoritative state transition engine for the window registry, the file
/// tree, and navigation. It is not transactional on its own; the store runs it against a working
/// copy and commits only on success.
///
/// # Errors
///
/// Returns [`ReducerError::WindowNotFound`] when an action references a missing window,
/// [`ReducerError::PathNotFound`] for navigation to a non-folder, and
/// [`ReducerError::FileSystem`] when the file tree rejects an edit.
pub fn reduce_desktop(
    state: &mut DesktopState,
    action: DesktopAction,
) -> Result<ActionOutcome, ReducerError> {
    let outcome = match action {
        DesktopAction::OpenWindow(request) => {
            ActionOutcome::WindowOpened(state.windows.open_window(request))
        }
        DesktopAction::CloseWindow { window_id } => {
            window_applied(state.windows.close_window(window_id), window_id)?
        }
        DesktopAction::MinimizeWindow { window_id } => {
            window_applied(state.windows.minimize_window(window_id), window_id)?
        }
        DesktopAction::MaximizeWindow { window_id } => {
            window_applied(state.windows.maximize_window(window_id), window_id)?
        }
        DesktopAction::FocusWindow { window_id } => {
            window_applied(state.windows.focus_window(window_id), window_id)?
        }
        DesktopAction::UpdateWindowPosition {
            window_id,
            position,
        } => window_applied(
            state.windows.update_window_position(window_id, position),
            window_id,
        )?,
        DesktopAction::UpdateWindowSize { window_id, size } => window_applied(
            state.windows.update_window_size(window_id, size),
            window_id,
        )?,
        DesktopAction::CreateFile {
            name,
            content,
            parent,
        } => ActionOutcome::NodeCreated(state.file_tree.create_file(name, content, parent)?),
        DesktopAction::CreateFolder { name, parent } => {
            ActionOutcome::NodeCreated(state.file_tree.create_folder(name, parent)?)
        }
        DesktopAction::UpdateFileContent { node_id, content } => {
            state.file_tree.update_file_content(node_id, content)?;
            ActionOutcome::Applied
        }
        DesktopAction::DeleteItem { node_id } => {
            let removed = state.file_tree.delete_item(node_id)?;
            retreat_to_existing_folder(state);
            ActionOutcome::NodesDeleted(removed)
        }
        DesktopAction::NavigateTo { path } => {
            let path = normalize_virtual_path(&path);
            if !is_folder_path(&state.file_tree, &path) {
                return Err(ReducerError::PathNotFound(path));
            }
            state.current_path = path;
            ActionOutcome::Applied
        }
    };
    Ok(outcome)
}

fn window_applied(found: bool, window_id: WindowId) -> Result<ActionOutcome, ReducerError> {
    if found {
        Ok(ActionOutcome::Applied)
    } else {
        Err(ReducerError::WindowNotFound(window_id))
    }
}

/// Moves the navigation path up until it names a folder again, e.g. after the folder being
/// browsed (or one of its ancestors) was deleted.
fn retreat_to_existing_folder(state: &mut DesktopState) {
    while state.current_path != "/" && !is_folder_path(&state.file_tree, &state.current_path) {
        state.current_path = parent_virtual_path(&state.current_path);
    }
}
