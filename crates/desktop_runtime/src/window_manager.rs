//! Window registry: identity and stacking allocation plus per-window mutations.
//!
//! Stacking order is derived solely from `z_index`. Opening and focusing both draw from one
//! strictly increasing counter, so values are never reused and ties cannot occur. The window list
//! itself stays in insertion order.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::model::{
    OpenWindowRequest, WindowId, WindowPosition, WindowRecord, WindowSize, DEFAULT_INITIAL_Z_INDEX,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowRegistry {
    next_window_id: u64,
    next_z_index: u64,
    windows: Arc<Vec<WindowRecord>>,
}

impl Default for WindowRegistry {
    fn default() -> Self {
        Self::with_initial_z_index(DEFAULT_INITIAL_Z_INDEX)
    }
}

impl WindowRegistry {
    /// Creates an empty registry whose first window gets `z_index`.
    pub fn with_initial_z_index(z_index: u64) -> Self {
        Self {
            next_window_id: 1,
            next_z_index: z_index,
            windows: Arc::new(Vec::new()),
        }
    }

    pub fn windows(&self) -> &[WindowRecord] {
        &self.windows
    }

    /// Shares the current window list; later mutations copy-on-write.
    pub fn window_list(&self) -> Arc<Vec<WindowRecord>> {
        Arc::clone(&self.windows)
    }

    pub fn window(&self, window_id: WindowId) -> Option<&WindowRecord> {
        self.windows.iter().find(|w| w.id == window_id)
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Stacking value the next open or focus will receive.
    pub fn peek_next_z_index(&self) -> u64 {
        self.next_z_index
    }

    /// Appends a new window on top of the stack and returns its id.
    pub fn open_window(&mut self, request: OpenWindowRequest) -> WindowId {
        let id = self.next_window_id();
        let z_index = self.next_z_index();
        Arc::make_mut(&mut self.windows).push(WindowRecord {
            id,
            title: request.title,
            content: request.content,
            is_minimized: request.is_minimized,
            is_maximized: request.is_maximized,
            position: request.position,
            size: request.size,
            z_index,
        });
        id
    }

    /// Removes a window. Returns `false` when the id is unknown.
    pub fn close_window(&mut self, window_id: WindowId) -> bool {
        let Some(index) = self.index_of(window_id) else {
            return false;
        };
        Arc::make_mut(&mut self.windows).remove(index);
        true
    }

    /// Flips the minimized flag; one taskbar affordance both hides and restores.
    pub fn minimize_window(&mut self, window_id: WindowId) -> bool {
        self.update(window_id, |w| w.is_minimized = !w.is_minimized)
    }

    /// Flips the maximized flag. Stored position and size are left untouched.
    pub fn maximize_window(&mut self, window_id: WindowId) -> bool {
        self.update(window_id, |w| w.is_maximized = !w.is_maximized)
    }

    /// Raises a window to the top by giving it a fresh stacking value.
    ///
    /// Every call allocates, even for the window already on top, so the counter never stalls.
    /// The relative order of all other windows is unchanged.
    pub fn focus_window(&mut self, window_id: WindowId) -> bool {
        if self.index_of(window_id).is_none() {
            return false;
        }
        let z_index = self.next_z_index();
        self.update(window_id, |w| w.z_index = z_index)
    }

    /// Overwrites the position. Clamping is the drag handler's job.
    pub fn update_window_position(&mut self, window_id: WindowId, position: WindowPosition) -> bool {
        self.update(window_id, |w| w.position = position)
    }

    /// Overwrites the size. Minimum sizes are the resize handler's job.
    pub fn update_window_size(&mut self, window_id: WindowId, size: WindowSize) -> bool {
        self.update(window_id, |w| w.size = size)
    }

    /// Highest-stacked visible window.
    pub fn focused_window_id(&self) -> Option<WindowId> {
        self.windows
            .iter()
            .filter(|w| w.is_visible())
            .max_by_key(|w| w.z_index)
            .map(|w| w.id)
    }

    fn index_of(&self, window_id: WindowId) -> Option<usize> {
        self.windows.iter().position(|w| w.id == window_id)
    }

    fn update(&mut self, window_id: WindowId, apply: impl FnOnce(&mut WindowRecord)) -> bool {
        let Some(index) = self.index_of(window_id) else {
            return false;
        };
        if let Some(window) = Arc::make_mut(&mut self.windows).get_mut(index) {
            apply(window);
        }
        true
    }

    fn next_window_id(&mut self) -> WindowId {
        let id = WindowId(self.next_window_id);
        self.next_window_id = self.next_window_id.saturating_add(1);
        id
    }

    fn next_z_index(&mut self) -> u64 {
        let z_index = self.next_z_index;
        self.next_z_index = self.next_z_index.saturating_add(1);
        z_index
    }
}
