//! Desktop store: the single state container both the window registry and the file tree live in.
//!
//! Every mutation runs against a working copy of [`DesktopState`] and is committed only when it
//! succeeds. A commit bumps the version and publishes a fresh [`DesktopSnapshot`] to every
//! subscriber; a rejected mutation leaves the previous snapshot current and publishes nothing.
//! Snapshots share their collections with the store through `Arc`, so readers never observe a
//! partially applied change.

use std::sync::Arc;

use futures::channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender};
use platform_host::{FsNode, FsNodeMap, NodeId};
use tracing::{debug, warn};

use crate::{
    config::DesktopConfig,
    model::{
        DesktopSnapshot, DesktopState, OpenWindowRequest, WindowId, WindowPosition, WindowRecord,
        WindowSize,
    },
    reducer::{reduce_desktop, ActionOutcome, DesktopAction, ReducerError},
};

#[derive(Debug, Default)]
/// Owns the session state and fans snapshots out to subscribers.
pub struct DesktopStore {
    state: DesktopState,
    version: u64,
    subscribers: Vec<UnboundedSender<DesktopSnapshot>>,
}

impl DesktopStore {
    /// Creates a store configured by `config`.
    pub fn new(config: &DesktopConfig) -> Self {
        Self {
            state: DesktopState::new(config),
            version: 0,
            subscribers: Vec::new(),
        }
    }

    /// Returns the current snapshot.
    pub fn snapshot(&self) -> DesktopSnapshot {
        self.state.snapshot(self.version)
    }

    /// Number of committed mutations so far.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Registers a subscriber that receives a snapshot after every committed mutation.
    ///
    /// Dropping the receiver unsubscribes it; it is pruned on the next publish.
    pub fn subscribe(&mut self) -> UnboundedReceiver<DesktopSnapshot> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    /// Applies an action, committing and publishing on success.
    ///
    /// # Errors
    ///
    /// Returns the [`ReducerError`] that rejected the action; the state is then unchanged.
    pub fn dispatch(&mut self, action: DesktopAction) -> Result<ActionOutcome, ReducerError> {
        self.transact(|state| reduce_desktop(state, action))
    }

    /// Opens a window on top of the stack and returns its id.
    pub fn open_window(&mut self, request: OpenWindowRequest) -> WindowId {
        let mut next = self.state.clone();
        let window_id = next.windows.open_window(request);
        self.commit(next);
        window_id
    }

    /// Closes a window. Returns `false` (and changes nothing) when the id is unknown.
    pub fn close_window(&mut self, window_id: WindowId) -> bool {
        self.dispatch(DesktopAction::CloseWindow { window_id }).is_ok()
    }

    /// Toggles a window's minimized flag. Returns `false` when the id is unknown.
    pub fn minimize_window(&mut self, window_id: WindowId) -> bool {
        self.dispatch(DesktopAction::MinimizeWindow { window_id }).is_ok()
    }

    /// Toggles a window's maximized flag. Returns `false` when the id is unknown.
    pub fn maximize_window(&mut self, window_id: WindowId) -> bool {
        self.dispatch(DesktopAction::MaximizeWindow { window_id }).is_ok()
    }

    /// Raises a window to the top. Returns `false` when the id is unknown.
    pub fn focus_window(&mut self, window_id: WindowId) -> bool {
        self.dispatch(DesktopAction::FocusWindow { window_id }).is_ok()
    }

    /// Overwrites a window's position. Returns `false` when the id is unknown.
    pub fn update_window_position(&mut self, window_id: WindowId, position: WindowPosition) -> bool {
        self.dispatch(DesktopAction::UpdateWindowPosition {
            window_id,
            position,
        })
        .is_ok()
    }

    /// Overwrites a window's size. Returns `false` when the id is unknown.
    pub fn update_window_size(&mut self, window_id: WindowId, size: WindowSize) -> bool {
        self.dispatch(DesktopAction::UpdateWindowSize { window_id, size }).is_ok()
    }

    /// Creates a file under `parent` (the root when `None`) and returns its id.
    ///
    /// # Errors
    ///
    /// Fails without mutating when `parent` is not an existing folder or the name is invalid or
    /// already taken by a sibling.
    pub fn create_file(
        &mut self,
        name: impl Into<String>,
        content: impl Into<String>,
        parent: Option<NodeId>,
    ) -> Result<NodeId, ReducerError> {
        let (name, content) = (name.into(), content.into());
        let parent = parent.unwrap_or(NodeId::ROOT);
        self.transact(|state| Ok(state.file_tree.create_file(name, content, parent)?))
    }

    /// Creates an empty folder under `parent` (the root when `None`) and returns its id.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Self::create_file`].
    pub fn create_folder(
        &mut self,
        name: impl Into<String>,
        parent: Option<NodeId>,
    ) -> Result<NodeId, ReducerError> {
        let name = name.into();
        let parent = parent.unwrap_or(NodeId::ROOT);
        self.transact(|state| Ok(state.file_tree.create_folder(name, parent)?))
    }

    /// Replaces a file's content.
    ///
    /// # Errors
    ///
    /// Fails for unknown ids and for folders.
    pub fn update_file_content(
        &mut self,
        node_id: NodeId,
        content: impl Into<String>,
    ) -> Result<(), ReducerError> {
        self.dispatch(DesktopAction::UpdateFileContent {
            node_id,
            content: content.into(),
        })
        .map(|_| ())
    }

    /// Deletes a node and its subtree. Returns `false` for unknown ids and for the root.
    pub fn delete_item(&mut self, node_id: NodeId) -> bool {
        self.dispatch(DesktopAction::DeleteItem { node_id }).is_ok()
    }

    /// Sets the current navigation path. Returns `false` when `path` is not a folder.
    pub fn navigate_to(&mut self, path: impl Into<String>) -> bool {
        self.dispatch(DesktopAction::NavigateTo { path: path.into() }).is_ok()
    }

    /// Child nodes of the folder at `path`; empty when the path does not name a folder.
    pub fn get_items_by_path(&self, path: &str) -> Vec<FsNode> {
        self.state
            .file_tree
            .get_items_by_path(path)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Resolves a path to the id of the node it names.
    pub fn find_item_id_by_path(&self, path: &str) -> Option<NodeId> {
        self.state.file_tree.find_item_id_by_path(path)
    }

    /// Looks up a node by id.
    pub fn get_item(&self, node_id: NodeId) -> Option<&FsNode> {
        self.state.file_tree.get_item(node_id)
    }

    /// Current window collection in insertion order.
    pub fn windows(&self) -> Arc<Vec<WindowRecord>> {
        self.state.windows.window_list()
    }

    /// Current file-node map.
    pub fn nodes(&self) -> FsNodeMap {
        self.state.file_tree.node_map()
    }

    /// Current navigation path.
    pub fn current_path(&self) -> &str {
        &self.state.current_path
    }

    fn transact<T>(
        &mut self,
        apply: impl FnOnce(&mut DesktopState) -> Result<T, ReducerError>,
    ) -> Result<T, ReducerError> {
        let mut next = self.state.clone();
        match apply(&mut next) {
            Ok(value) => {
                self.commit(next);
                Ok(value)
            }
            Err(err) if err.is_not_found() => {
                debug!("ignored desktop action: {err}");
                Err(err)
            }
            Err(err) => {
                warn!("rejected desktop action: {err}");
                Err(err)
            }
        }
    }

    fn commit(&mut self, next: DesktopState) {
        self.state = next;
        self.version = self.version.saturating_add(1);
        let snapshot = self.snapshot();
        self.subscribers
            .retain(|subscriber| subscriber.unbounded_send(snapshot.clone()).is_ok());
        debug!(
            version = self.version,
            subscribers = self.subscribers.len(),
            "committed desktop snapshot"
        );
    }
}

#[cfg(test)]
mod tests {
    use desktop_app_contract::{AppId, WindowContent};
    use platform_host::FsNodeKind;
    use pretty_assertions::assert_eq;

    use super::*;

    fn empty_store() -> DesktopStore {
        DesktopStore::new(&DesktopConfig {
            seed_file_system: false,
            ..DesktopConfig::default()
        })
    }

    #[test]
    fn default_store_is_seeded_and_starts_at_root() {
        let store = DesktopStore::default();
        assert_eq!(store.current_path(), "/");
        assert_eq!(store.get_items_by_path("/").len(), 6);
        assert!(store.windows().is_empty());
        assert_eq!(store.version(), 0);
    }

    #[test]
    fn photos_scenario() {
        let mut store = empty_store();

        let photos = store.create_folder("Photos", Some(NodeId::ROOT)).expect("create");
        let items = store.get_items_by_path("/");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Photos");
        assert_eq!(items[0].kind(), FsNodeKind::Folder);

        assert!(store.delete_item(photos));
        assert!(store.get_items_by_path("/").is_empty());
    }

    #[test]
    fn create_file_defaults_to_root_and_round_trips_content() {
        let mut store = empty_store();
        store.create_file("a.txt", "hello", None).expect("create");

        let items = store.get_items_by_path("/");
        assert_eq!(items[0].content(), Some("hello"));
        assert_eq!(items[0].size(), Some(5));
    }

    #[test]
    fn snapshots_are_immutable_and_versions_advance() {
        let mut store = empty_store();
        let before = store.snapshot();

        let win = store.open_window(OpenWindowRequest::launch(AppId::Terminal));
        store.create_folder("Docs", None).expect("create");

        assert!(before.windows.is_empty());
        assert_eq!(before.nodes().len(), 1);
        let after = store.snapshot();
        assert_eq!(after.version, before.version + 2);
        assert_eq!(after.window(win).map(|w| w.app_id()), Some(AppId::Terminal));
        assert_eq!(after.nodes().len(), 2);
    }

    #[test]
    fn rejected_and_missing_targets_do_not_commit() {
        let mut store = empty_store();
        let win = store.open_window(OpenWindowRequest::launch(AppId::Calculator));
        let version = store.version();

        assert!(store.close_window(win));
        assert!(!store.close_window(win));
        assert!(!store.focus_window(win));
        assert!(!store.delete_item(NodeId(99)));
        assert!(!store.delete_item(NodeId::ROOT));
        assert!(!store.navigate_to("/missing"));
        assert!(store.create_folder("x", Some(NodeId(99))).is_err());

        assert_eq!(store.version(), version + 1);
    }

    #[test]
    fn subscribers_receive_each_commit_and_closed_ones_are_pruned() {
        let mut store = empty_store();
        let mut rx = store.subscribe();
        let dropped = store.subscribe();
        drop(dropped);

        let win = store.open_window(OpenWindowRequest::new(WindowContent::file_manager(
            "/Documents",
        )));
        assert!(!store.minimize_window(WindowId(500)));
        assert!(store.minimize_window(win));

        let first = rx.try_next().expect("ready").expect("snapshot");
        let second = rx.try_next().expect("ready").expect("snapshot");
        assert!(rx.try_next().is_err(), "no snapshot for the ignored action");
        assert_eq!(first.version, 1);
        assert_eq!(second.version, 2);
        assert!(!first.windows[0].is_minimized);
        assert!(second.windows[0].is_minimized);
        assert_eq!(store.subscribers.len(), 1);
    }

    #[test]
    fn navigation_and_update_content() {
        let mut store = DesktopStore::default();
        assert!(store.navigate_to("/documents"));
        assert_eq!(store.current_path(), "/documents");
        assert_eq!(store.snapshot().current_items().len(), 1);

        let readme = store
            .find_item_id_by_path("/Documents/README.txt")
            .expect("readme");
        store.update_file_content(readme, "short").expect("save");
        assert_eq!(store.get_item(readme).and_then(FsNode::size), Some(5));

        let docs = store.find_item_id_by_path("/Documents").expect("docs");
        assert!(store.update_file_content(docs, "x").is_err());
    }

    #[test]
    fn geometry_and_toggle_operations_apply_through_the_store() {
        let mut store = empty_store();
        let win = store.open_window(OpenWindowRequest::launch(AppId::WebBrowser));

        assert!(store.update_window_position(win, WindowPosition { x: 5, y: 6 }));
        assert!(store.update_window_size(win, WindowSize { width: 640, height: 480 }));
        assert!(store.maximize_window(win));

        let snapshot = store.snapshot();
        let record = snapshot.window(win).expect("window");
        assert_eq!(record.position, WindowPosition { x: 5, y: 6 });
        assert_eq!(record.size, WindowSize { width: 640, height: 480 });
        assert!(record.is_maximized);
    }
}
