//! Desktop session state: the window registry, the virtual file tree, and the store that
//! composes them and publishes immutable snapshots to the UI layer.

pub mod config;
pub mod model;
pub mod reducer;
pub mod shared;
pub mod store;
pub mod window_manager;

pub use config::{ConfigError, DesktopConfig};
pub use model::*;
pub use reducer::{reduce_desktop, ActionOutcome, DesktopAction, ReducerError};
pub use shared::SharedDesktopStore;
pub use store::DesktopStore;
pub use window_manager::WindowRegistry;
