use std::{fmt, sync::Arc};

use desktop_app_contract::{AppId, WindowContent};
use platform_host::{normalize_virtual_path, FsNode, FsNodeMap, NodeId, VirtualFileTree};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{config::DesktopConfig, window_manager::WindowRegistry};

pub const DESKTOP_SNAPSHOT_SCHEMA_VERSION: u32 = 1;
pub const DEFAULT_WINDOW_X: i32 = 100;
pub const DEFAULT_WINDOW_Y: i32 = 100;
pub const DEFAULT_WINDOW_WIDTH: i32 = 800;
pub const DEFAULT_WINDOW_HEIGHT: i32 = 600;
/// Smallest size the resize handler lets a window shrink to. Not enforced by the registry.
pub const MIN_WINDOW_WIDTH: i32 = 300;
pub const MIN_WINDOW_HEIGHT: i32 = 200;
/// Height of the taskbar strip a dragged window must stay above.
pub const TASKBAR_HEIGHT: i32 = 48;
pub const DEFAULT_INITIAL_Z_INDEX: u64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WindowId(pub u64);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowPosition {
    pub x: i32,
    pub y: i32,
}

impl WindowPosition {
    /// Keeps a window of `size` inside `viewport` and above the taskbar, pinning it to the
    /// top-left corner when it does not fit.
    pub fn clamped_to_viewport(self, size: WindowSize, viewport: WindowSize) -> Self {
        let max_x = viewport.width - size.width;
        let max_y = viewport.height - size.height - TASKBAR_HEIGHT;
        Self {
            x: self.x.min(max_x).max(0),
            y: self.y.min(max_y).max(0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSize {
    pub width: i32,
    pub height: i32,
}

impl WindowSize {
    pub fn clamped_min(self, min_width: i32, min_height: i32) -> Self {
        Self {
            width: self.width.max(min_width),
            height: self.height.max(min_height),
        }
    }
}

/// Effective presentation of a window derived from its two visibility flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindowDisplayState {
    Normal,
    Minimized,
    Maximized,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowRecord {
    pub id: WindowId,
    pub title: String,
    pub content: WindowContent,
    pub is_minimized: bool,
    pub is_maximized: bool,
    /// Top-left corner; kept while maximized so restoring brings the old geometry back.
    pub position: WindowPosition,
    pub size: WindowSize,
    pub z_index: u64,
}

impl WindowRecord {
    pub fn app_id(&self) -> AppId {
        self.content.app_id()
    }

    /// Minimized wins over maximized: a minimized window is never drawn.
    pub fn display_state(&self) -> WindowDisplayState {
        if self.is_minimized {
            WindowDisplayState::Minimized
        } else if self.is_maximized {
            WindowDisplayState::Maximized
        } else {
            WindowDisplayState::Normal
        }
    }

    pub fn is_visible(&self) -> bool {
        !self.is_minimized
    }
}

/// Caller-supplied fields of a new window; the registry assigns `id` and `z_index`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenWindowRequest {
    pub title: String,
    pub content: WindowContent,
    pub is_minimized: bool,
    pub is_maximized: bool,
    pub position: WindowPosition,
    pub size: WindowSize,
}

impl OpenWindowRequest {
    pub fn new(content: WindowContent) -> Self {
        Self {
            title: content.app_id().title().to_string(),
            content,
            is_minimized: false,
            is_maximized: false,
            position: WindowPosition {
                x: DEFAULT_WINDOW_X,
                y: DEFAULT_WINDOW_Y,
            },
            size: WindowSize {
                width: DEFAULT_WINDOW_WIDTH,
                height: DEFAULT_WINDOW_HEIGHT,
            },
        }
    }

    /// Request used when an app is started from the launcher.
    pub fn launch(app_id: AppId) -> Self {
        Self::new(WindowContent::launch(app_id))
    }
}

/// Mutable session state owned by the store. Cloning is cheap: collections sit behind [`Arc`].
#[derive(Debug, Clone, PartialEq)]
pub struct DesktopState {
    pub windows: WindowRegistry,
    pub file_tree: VirtualFileTree,
    pub current_path: String,
}

impl Default for DesktopState {
    fn default() -> Self {
        Self::new(&DesktopConfig::default())
    }
}

impl DesktopState {
    pub fn new(config: &DesktopConfig) -> Self {
        let file_tree = if config.seed_file_system {
            VirtualFileTree::seeded()
        } else {
            VirtualFileTree::new()
        };
        let mut current_path = normalize_virtual_path(&config.initial_path);
        if !is_folder_path(&file_tree, &current_path) {
            warn!(path = %current_path, "configured initial path is not a folder, using `/`");
            current_path = "/".to_string();
        }
        Self {
            windows: WindowRegistry::with_initial_z_index(config.initial_z_index),
            file_tree,
            current_path,
        }
    }

    pub fn snapshot(&self, version: u64) -> DesktopSnapshot {
        DesktopSnapshot {
            schema_version: DESKTOP_SNAPSHOT_SCHEMA_VERSION,
            version,
            windows: self.windows.window_list(),
            file_tree: self.file_tree.clone(),
            current_path: self.current_path.clone(),
        }
    }
}

pub(crate) fn is_folder_path(tree: &VirtualFileTree, path: &str) -> bool {
    tree.find_item_id_by_path(path)
        .and_then(|id| tree.get_item(id))
        .is_some_and(FsNode::is_folder)
}

/// Immutable view of the store published after every successful mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesktopSnapshot {
    pub schema_version: u32,
    /// Increments by one per committed mutation.
    pub version: u64,
    /// Windows in insertion order.
    pub windows: Arc<Vec<WindowRecord>>,
    pub file_tree: VirtualFileTree,
    pub current_path: String,
}

impl DesktopSnapshot {
    pub fn window(&self, window_id: WindowId) -> Option<&WindowRecord> {
        self.windows.iter().find(|w| w.id == window_id)
    }

    /// Visible windows back-to-front.
    pub fn render_order(&self) -> Vec<&WindowRecord> {
        let mut visible: Vec<_> = self.windows.iter().filter(|w| w.is_visible()).collect();
        visible.sort_by_key(|w| w.z_index);
        visible
    }

    /// Visible windows in insertion order, as listed on the taskbar.
    pub fn taskbar_windows(&self) -> Vec<&WindowRecord> {
        self.windows.iter().filter(|w| w.is_visible()).collect()
    }

    /// The top-most visible window.
    pub fn top_window(&self) -> Option<&WindowRecord> {
        self.windows
            .iter()
            .filter(|w| w.is_visible())
            .max_by_key(|w| w.z_index)
    }

    pub fn nodes(&self) -> FsNodeMap {
        self.file_tree.node_map()
    }

    pub fn node(&self, node_id: NodeId) -> Option<&FsNode> {
        self.file_tree.get_item(node_id)
    }

    pub fn get_items_by_path(&self, path: &str) -> Vec<&FsNode> {
        self.file_tree.get_items_by_path(path)
    }

    /// Items of the folder the shell is currently navigated to.
    pub fn current_items(&self) -> Vec<&FsNode> {
        self.file_tree.get_items_by_path(&self.current_path)
    }
}
