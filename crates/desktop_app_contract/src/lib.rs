//! Shared contract types between the desktop window registry and the apps rendered inside
//! managed windows.
//!
//! Each window carries a [`WindowContent`]: a tagged union over the closed set of apps, holding
//! the strongly-typed launch payload that app needs. The registry stores it without inspecting
//! it; the rendering layer dispatches on it with one exhaustive `match`.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

use serde::{Deserialize, Serialize};

/// Filename given to new text-editor windows.
pub const UNTITLED_FILENAME: &str = "Untitled.txt";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Apps that can be hosted in a managed window.
pub enum AppId {
    /// Virtual file system browser.
    FileManager,
    /// Plain-text editor.
    TextEditor,
    /// Calculator.
    Calculator,
    /// Command terminal over the virtual file system.
    Terminal,
    /// Simulated web browser.
    WebBrowser,
    /// System settings.
    Settings,
}

impl AppId {
    /// Every app, in launcher order.
    pub const ALL: [AppId; 6] = [
        Self::FileManager,
        Self::TextEditor,
        Self::Calculator,
        Self::Terminal,
        Self::WebBrowser,
        Self::Settings,
    ];

    /// Launcher label, also used as the default window title.
    pub const fn title(self) -> &'static str {
        match self {
            Self::FileManager => "File Manager",
            Self::TextEditor => "Text Editor",
            Self::Calculator => "Calculator",
            Self::Terminal => "Terminal",
            Self::WebBrowser => "Web Browser",
            Self::Settings => "Settings",
        }
    }

    /// Symbolic component tag naming the renderer for this app.
    pub const fn component(self) -> &'static str {
        match self {
            Self::FileManager => "FileManager",
            Self::TextEditor => "TextEditor",
            Self::Calculator => "Calculator",
            Self::Terminal => "Terminal",
            Self::WebBrowser => "WebBrowser",
            Self::Settings => "Settings",
        }
    }

    /// Parses a component tag back into an app id.
    pub fn from_component(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|app| app.component() == tag)
    }
}

impl std::fmt::Display for AppId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.component())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Launch payload for a file-manager window.
pub struct FileManagerData {
    /// Folder path the window opens on.
    pub current_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Launch payload for a text-editor window.
pub struct TextEditorData {
    /// Initial buffer text.
    pub content: String,
    /// Name shown in the editor's title bar and used when saving.
    pub filename: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "component", content = "data")]
/// The app rendered inside a window, together with its typed payload.
pub enum WindowContent {
    /// File manager opened on a folder.
    FileManager(FileManagerData),
    /// Text editor opened with a buffer.
    TextEditor(TextEditorData),
    /// Calculator.
    Calculator,
    /// Terminal.
    Terminal,
    /// Web browser.
    WebBrowser,
    /// Settings.
    Settings,
}

impl WindowContent {
    /// Default payload used when an app is started from the launcher.
    pub fn launch(app_id: AppId) -> Self {
        match app_id {
            AppId::FileManager => Self::file_manager("/"),
            AppId::TextEditor => Self::text_editor("", UNTITLED_FILENAME),
            AppId::Calculator => Self::Calculator,
            AppId::Terminal => Self::Terminal,
            AppId::WebBrowser => Self::WebBrowser,
            AppId::Settings => Self::Settings,
        }
    }

    /// File manager opened on `current_path`.
    pub fn file_manager(current_path: impl Into<String>) -> Self {
        Self::FileManager(FileManagerData {
            current_path: current_path.into(),
        })
    }

    /// Text editor holding `content` under `filename`.
    pub fn text_editor(content: impl Into<String>, filename: impl Into<String>) -> Self {
        Self::TextEditor(TextEditorData {
            content: content.into(),
            filename: filename.into(),
        })
    }

    /// App that renders this content.
    pub const fn app_id(&self) -> AppId {
        match self {
            Self::FileManager(_) => AppId::FileManager,
            Self::TextEditor(_) => AppId::TextEditor,
            Self::Calculator => AppId::Calculator,
            Self::Terminal => AppId::Terminal,
            Self::WebBrowser => AppId::WebBrowser,
            Self::Settings => AppId::Settings,
        }
    }

    /// Component tag of [`Self::app_id`].
    pub const fn component(&self) -> &'static str {
        self.app_id().component()
    }
}
