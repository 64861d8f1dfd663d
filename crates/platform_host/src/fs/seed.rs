//! Default contents of a fresh desktop session's file tree.

use tracing::warn;

use super::{
    tree::VirtualFileTree,
    types::{FsError, NodeId},
};

/// Top-level folders created under `/` for a new session, in display order.
pub const DEFAULT_FOLDERS: [&str; 6] = [
    "Desktop",
    "Documents",
    "Downloads",
    "Pictures",
    "Music",
    "Videos",
];

/// Name of the greeting file placed in `/Desktop`.
pub const WELCOME_FILE_NAME: &str = "Welcome.txt";
/// Name of the documentation file placed in `/Documents`.
pub const README_FILE_NAME: &str = "README.txt";

/// Content of [`WELCOME_FILE_NAME`].
pub const WELCOME_TEXT: &str = "Welcome to WebOS!\n\nThis is a fully functional web-based operating system. You can:\n\n- Open and manage files\n- Run applications\n- Customize your desktop\n- And much more!\n\nEnjoy exploring your new OS!";

/// Content of [`README_FILE_NAME`].
pub const README_TEXT: &str = "WebOS Documentation\n\n===================\n\nThis operating system includes:\n\n1. File Manager\n2. Text Editor\n3. Calculator\n4. Terminal\n5. Settings\n6. Web Browser\n\nAll applications are fully functional and provide a native OS experience.";

impl VirtualFileTree {
    /// Builds the default session tree: the standard top-level folders plus the welcome and
    /// readme files.
    pub fn seeded() -> Self {
        Self::try_seeded().unwrap_or_else(|err| {
            warn!("default file tree seed failed, starting empty: {err}");
            Self::new()
        })
    }

    fn try_seeded() -> Result<Self, FsError> {
        let mut tree = Self::new();
        let mut folders = Vec::with_capacity(DEFAULT_FOLDERS.len());
        for name in DEFAULT_FOLDERS {
            folders.push(tree.create_folder(name, NodeId::ROOT)?);
        }
        tree.create_file(WELCOME_FILE_NAME, WELCOME_TEXT, folders[0])?;
        tree.create_file(README_FILE_NAME, README_TEXT, folders[1])?;
        Ok(tree)
    }
}
