//! Host-domain primitives shared by the desktop runtime.
//!
//! This crate owns the session's virtual file system (node model, path normalization, and the
//! arena-backed [`VirtualFileTree`]) together with the time helpers used to stamp nodes. Nothing
//! here touches durable storage; the tree lives in memory for one session.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod fs;
pub mod time;

pub use fs::path::{
    join_virtual_path, names_match, normalize_virtual_path, parent_virtual_path,
    virtual_path_segments,
};
pub use fs::seed::{
    DEFAULT_FOLDERS, README_FILE_NAME, README_TEXT, WELCOME_FILE_NAME, WELCOME_TEXT,
};
pub use fs::tree::{FsNodeMap, VirtualFileTree};
pub use fs::types::{FsError, FsNode, FsNodeBody, FsNodeKind, NodeId, ROOT_NAME};
pub use time::{next_monotonic_timestamp_ms, unix_time_ms_now};
