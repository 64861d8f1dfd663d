use std::collections::BTreeSet;

use desktop_app_contract::AppId;
use desktop_runtime::{
    DesktopConfig, DesktopStore, OpenWindowRequest, WindowId, DESKTOP_SNAPSHOT_SCHEMA_VERSION,
};
use platform_host::{FsNode, FsNodeMap, NodeId};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn empty_store() -> DesktopStore {
    DesktopStore::new(&DesktopConfig {
        seed_file_system: false,
        ..DesktopConfig::default()
    })
}

#[derive(Debug, Clone)]
enum WindowOp {
    Open(AppId),
    Close(usize),
    Focus(usize),
    Minimize(usize),
    Maximize(usize),
}

fn app_id() -> impl Strategy<Value = AppId> {
    prop::sample::select(AppId::ALL.to_vec())
}

fn window_op() -> impl Strategy<Value = WindowOp> {
    prop_oneof![
        3 => app_id().prop_map(WindowOp::Open),
        1 => any::<usize>().prop_map(WindowOp::Close),
        2 => any::<usize>().prop_map(WindowOp::Focus),
        1 => any::<usize>().prop_map(WindowOp::Minimize),
        1 => any::<usize>().prop_map(WindowOp::Maximize),
    ]
}

/// Picks an existing window, or an id that was never allocated when `pick` lands past the end.
fn pick_window(store: &DesktopStore, pick: usize) -> WindowId {
    let windows = store.windows();
    windows
        .get(pick % (windows.len() + 1))
        .map(|w| w.id)
        .unwrap_or(WindowId(u64::MAX))
}

#[derive(Debug, Clone)]
enum FsOp {
    CreateFolder(usize, String),
    CreateFile(usize, String, String),
    Delete(usize),
}

fn fs_op() -> impl Strategy<Value = FsOp> {
    let name = "[A-Za-z]{1,4}";
    prop_oneof![
        3 => (any::<usize>(), name).prop_map(|(pick, name)| FsOp::CreateFolder(pick, name)),
        2 => (any::<usize>(), name, "[ -~éß中😀]{0,12}")
            .prop_map(|(pick, name, content)| FsOp::CreateFile(pick, name, content)),
        2 => any::<usize>().prop_map(FsOp::Delete),
    ]
}

fn pick_node(nodes: &FsNodeMap, pick: usize) -> NodeId {
    let ids: Vec<_> = nodes.keys().copied().collect();
    ids[pick % ids.len()]
}

fn subtree(nodes: &FsNodeMap, id: NodeId) -> Vec<NodeId> {
    let mut out = vec![id];
    if let Some(children) = nodes.get(&id).and_then(FsNode::children) {
        for child in children {
            out.extend(subtree(nodes, *child));
        }
    }
    out
}

proptest! {
    #[test]
    fn stacking_values_stay_unique_and_last_raised_window_is_on_top(
        ops in prop::collection::vec(window_op(), 1..64)
    ) {
        let mut store = empty_store();
        let mut last_raised = None;

        for op in ops {
            match op {
                WindowOp::Open(app) => {
                    last_raised = Some(store.open_window(OpenWindowRequest::launch(app)));
                }
                WindowOp::Focus(pick) => {
                    let id = pick_window(&store, pick);
                    if store.focus_window(id) {
                        last_raised = Some(id);
                    }
                }
                WindowOp::Close(pick) => {
                    store.close_window(pick_window(&store, pick));
                }
                WindowOp::Minimize(pick) => {
                    store.minimize_window(pick_window(&store, pick));
                }
                WindowOp::Maximize(pick) => {
                    store.maximize_window(pick_window(&store, pick));
                }
            }

            let windows = store.windows();
            let ids: BTreeSet<_> = windows.iter().map(|w| w.id).collect();
            let z_values: BTreeSet<_> = windows.iter().map(|w| w.z_index).collect();
            prop_assert_eq!(ids.len(), windows.len());
            prop_assert_eq!(z_values.len(), windows.len());

            if let Some(top) = last_raised.and_then(|id| windows.iter().find(|w| w.id == id)) {
                prop_assert!(windows
                    .iter()
                    .filter(|w| w.id != top.id)
                    .all(|w| w.z_index < top.z_index));
            }
        }
    }

    #[test]
    fn tree_stays_consistent_and_deletes_whole_subtrees(
        ops in prop::collection::vec(fs_op(), 1..48)
    ) {
        let mut store = empty_store();

        for op in ops {
            let before = store.nodes();
            match op {
                FsOp::CreateFolder(pick, name) => {
                    let parent = pick_node(&before, pick);
                    match store.create_folder(name.clone(), Some(parent)) {
                        Ok(id) => {
                            let node = store.get_item(id).expect("created");
                            prop_assert_eq!(node.parent, Some(parent));
                            prop_assert_eq!(node.children().map(<[NodeId]>::len), Some(0));
                            prop_assert_eq!(store.nodes().len(), before.len() + 1);
                        }
                        Err(_) => prop_assert_eq!(&store.nodes(), &before),
                    }
                }
                FsOp::CreateFile(pick, name, content) => {
                    let parent = pick_node(&before, pick);
                    match store.create_file(name, content.clone(), Some(parent)) {
                        Ok(id) => {
                            let node = store.get_item(id).expect("created");
                            prop_assert_eq!(node.content(), Some(content.as_str()));
                            prop_assert_eq!(
                                node.size(),
                                Some(content.encode_utf16().count() as u64)
                            );
                        }
                        Err(_) => prop_assert_eq!(&store.nodes(), &before),
                    }
                }
                FsOp::Delete(pick) => {
                    let target = pick_node(&before, pick);
                    let doomed = subtree(&before, target);
                    let deleted = store.delete_item(target);
                    prop_assert_eq!(deleted, !target.is_root());
                    if deleted {
                        let after = store.nodes();
                        prop_assert_eq!(after.len(), before.len() - doomed.len());
                        for id in &doomed {
                            prop_assert!(store.get_item(*id).is_none());
                        }
                        prop_assert!(after
                            .values()
                            .filter_map(FsNode::children)
                            .all(|children| !children.contains(&target)));
                    }
                }
            }
            prop_assert!(store.snapshot().file_tree.check_consistency().is_ok());
        }
    }

    #[test]
    fn path_resolution_ignores_case(name in "[a-z]{1,10}") {
        let mut store = empty_store();
        let shouted = name.to_uppercase();
        let id = store.create_folder(shouted.clone(), None).expect("create");

        prop_assert_eq!(store.find_item_id_by_path(&format!("/{name}")), Some(id));
        prop_assert_eq!(store.find_item_id_by_path(&format!("/{shouted}")), Some(id));
    }
}

#[test]
fn focusing_twice_keeps_advancing() {
    let mut store = empty_store();
    let first = store.open_window(OpenWindowRequest::launch(AppId::Terminal));
    store.open_window(OpenWindowRequest::launch(AppId::Settings));

    store.focus_window(first);
    let once = store.snapshot().window(first).expect("window").z_index;
    store.focus_window(first);
    let twice = store.snapshot().window(first).expect("window").z_index;

    assert!(twice > once);
}

#[test]
fn seeded_welcome_file_is_reachable_from_the_desktop_folder() {
    let store = DesktopStore::default();
    let desktop = store.get_items_by_path("/Desktop");
    assert_eq!(desktop.len(), 1);
    assert_eq!(desktop[0].name, platform_host::WELCOME_FILE_NAME);
    assert_eq!(
        desktop[0].size(),
        Some(platform_host::WELCOME_TEXT.encode_utf16().count() as u64)
    );
}

#[test]
fn snapshot_serializes_for_the_rendering_layer() {
    let mut store = empty_store();
    store.open_window(OpenWindowRequest::launch(AppId::FileManager));
    store.create_file("a.txt", "hello", None).expect("create");

    let value = serde_json::to_value(store.snapshot()).expect("serialize");

    assert_eq!(value["schema_version"], DESKTOP_SNAPSHOT_SCHEMA_VERSION);
    assert_eq!(value["windows"][0]["content"]["component"], "FileManager");
    assert_eq!(value["windows"][0]["content"]["data"]["currentPath"], "/");
    assert_eq!(value["windows"][0]["z_index"], 1000);
    assert_eq!(value["current_path"], "/");
}
