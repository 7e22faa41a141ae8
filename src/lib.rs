pub mod config;
pub mod container;
pub mod format;
pub mod i18n;
pub mod model;
pub mod session;
pub mod utils;

// 重新导出主要结构
pub use config::EditorConfig;
pub use container::{ScriptCipher, TextLanguage};
pub use format::{AdapterSet, ContainerCodec, FileFormat, FormatAdapter, SidecarCodec};
pub use i18n::{Language, LocalizationCatalog, UiKey};
pub use model::{Content, EntryMap, Project, ProjectStats, ResourceModel};
pub use session::{EditSession, RequestOutcome, SessionState};
pub use utils::{EditorError, Result};

// 常量定义
pub const SUPPORTED_EXTENSIONS: &[&str] = &["assets", "assets.json"];
