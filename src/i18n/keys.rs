/// 定义界面文本键：变体名与目录中的字符串键一一对应
macro_rules! ui_keys {
    ($($variant:ident => $key:literal,)+) => {
        /// 已知的界面文本键
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum UiKey {
            $($variant,)+
        }

        impl UiKey {
            /// 全部键，按声明顺序
            pub const ALL: &'static [UiKey] = &[$(UiKey::$variant,)+];

            /// 目录中的字符串键
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(UiKey::$variant => $key,)+
                }
            }
        }
    };
}

ui_keys! {
    AppTitle => "appTitle",
    LoadProject => "loadProject",
    SaveProject => "saveProject",
    Export => "export",
    UploadDialogueFile => "uploadDialogueFile",
    UploadDescription => "uploadDescription",
    LoadDialogueFile => "loadDialogueFile",
    Search => "search",
    SearchPlaceholder => "searchPlaceholder",
    FilterByScene => "filterByScene",
    AllScenes => "allScenes",
    NoDialogueFound => "noDialogueFound",
    Name => "name",
    OriginalText => "originalText",
    TranslatedText => "translatedText",
    Edited => "edited",
    Save => "save",
    Cancel => "cancel",
    Edit => "edit",
    RevertToOriginal => "revertToOriginal",
    ExportDialogue => "exportDialogue",
    ExportFormat => "exportFormat",
    OriginalFormat => "originalFormat",
    ExportingLanguage => "exportingLanguage",
    TargetLanguage => "targetLanguage",
    LoadedSummary => "loadedSummary",
    ExportedTo => "exportedTo",
    BackupCreated => "backupCreated",
    EntryUpdated => "entryUpdated",
    CommittedEdits => "committedEdits",
    SelectionCancelled => "selectionCancelled",
    UnknownFormat => "unknownFormat",
    RequestRejected => "requestRejected",
    LoadFailed => "loadFailed",
    ExportFailed => "exportFailed",
}

impl std::fmt::Display for UiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
