/// JSON 镜像文件
///
/// 纯粹的序列化与反序列化：
/// `{ [分类]: { [条目]: { "originalContent": string, "editedContent"?: string } } }`
use std::path::Path;

use tracing::{debug, info};

use super::file_format::FileFormat;
use super::traits::FormatAdapter;
use crate::model::Project;
use crate::utils::{atomic_write, EditorError, Result};

/// JSON 镜像编解码器
#[derive(Debug, Clone, Copy, Default)]
pub struct SidecarCodec;

impl SidecarCodec {
    /// 从 JSON 文本解析项目
    pub fn from_json(json: &str) -> Result<Project> {
        let json = json.strip_prefix('\u{feff}').unwrap_or(json);
        serde_json::from_str(json).map_err(|e| EditorError::parse(format!("JSON 结构不匹配: {}", e)))
    }

    /// 将项目序列化为格式化的 JSON 文本
    pub fn to_json(project: &Project) -> Result<String> {
        serde_json::to_string_pretty(project)
            .map_err(|e| EditorError::export(format!("无法序列化项目: {}", e)))
    }
}

impl FormatAdapter for SidecarCodec {
    fn parse(&self, path: &Path) -> Result<Project> {
        let bytes = std::fs::read(path)
            .map_err(|e| EditorError::parse(format!("无法读取 {:?}: {}", path, e)))?;
        let json = std::str::from_utf8(&bytes)
            .map_err(|e| EditorError::parse(format!("不支持的编码（需要 UTF-8）: {}", e)))?;

        let project = Self::from_json(json)?;
        info!("从 {:?} 读取 {} 个分类", path, project.len());
        Ok(project)
    }

    fn export(&self, project: &Project, path: &Path) -> Result<()> {
        let json = Self::to_json(project)?;
        atomic_write(path, json.as_bytes())?;
        debug!("写入 {:?}: {} 字节", path, json.len());
        Ok(())
    }

    fn format(&self) -> FileFormat {
        FileFormat::Sidecar
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Content, EntryMap};
    use tempfile::TempDir;

    fn sample_project() -> Project {
        let mut town = EntryMap::new();
        town.insert("GREETING".to_string(), Content::new("Hi"));
        town.insert(
            "FAREWELL".to_string(),
            Content {
                original_text: "Bye".to_string(),
                edited_text: Some("再见".to_string()),
            },
        );

        let mut project = Project::new();
        project.insert("EN_Town".to_string(), town);
        project.insert("EN_Empty".to_string(), EntryMap::new());
        project
    }

    #[test]
    fn test_json_shape() {
        let json = SidecarCodec::to_json(&sample_project()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["EN_Town"]["GREETING"], serde_json::json!({ "originalContent": "Hi" }));
        assert_eq!(
            value["EN_Town"]["FAREWELL"],
            serde_json::json!({ "originalContent": "Bye", "editedContent": "再见" })
        );
        assert_eq!(value["EN_Empty"], serde_json::json!({}));
    }

    #[test]
    fn test_export_then_parse() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("town.assets.json");

        SidecarCodec.export(&sample_project(), &path).unwrap();
        assert_eq!(SidecarCodec.parse(&path).unwrap(), sample_project());
    }

    #[test]
    fn test_schema_mismatch() {
        let cases = [
            r#"["not", "an", "object"]"#,
            r#"{"EN_Town": {"A": {"originalContent": 5}}}"#,
            r#"{"EN_Town": {"A": {"editedContent": "x"}}}"#,
            r#"{"EN_Town": {"A": {"originalContent": "x", "comment": "y"}}}"#,
            r#"{"EN_Town": "flat"}"#,
            "{",
        ];
        for json in cases {
            let result = SidecarCodec::from_json(json);
            assert!(matches!(result, Err(EditorError::Parse { .. })), "{}", json);
        }
    }

    #[test]
    fn test_parse_rejects_non_utf8() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.assets.json");
        std::fs::write(&path, [0xFF, 0xFE, b'{', 0, b'}', 0]).unwrap();

        assert!(matches!(SidecarCodec.parse(&path), Err(EditorError::Parse { .. })));
    }

    #[test]
    fn test_parse_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = SidecarCodec.parse(&dir.path().join("missing.assets.json"));
        assert!(matches!(result, Err(EditorError::Parse { .. })));
    }

    #[test]
    fn test_export_to_missing_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("no_such_dir").join("out.assets.json");

        let result = SidecarCodec.export(&sample_project(), &path);
        assert!(matches!(result, Err(EditorError::Export { .. })));
        assert!(!path.exists());
    }

    #[test]
    fn test_failed_export_keeps_existing_destination() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("town.assets.json");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("notes.txt"), b"keep me").unwrap();

        let result = SidecarCodec.export(&sample_project(), &path);
        assert!(matches!(result, Err(EditorError::Export { .. })));

        assert_eq!(std::fs::read(path.join("notes.txt")).unwrap(), b"keep me");
        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(leftovers, vec![std::ffi::OsString::from("town.assets.json")]);
    }
}
