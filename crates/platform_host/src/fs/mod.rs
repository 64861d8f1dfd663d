//! In-memory virtual file system: node model, path helpers, and the file tree.

pub mod path;
pub mod seed;
pub mod tree;
pub mod types;
