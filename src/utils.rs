use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

/// 自定义错误类型
#[derive(Error, Debug)]
pub enum EditorError {
    /// 源文件格式错误（签名、截断、编码、JSON 结构不匹配）
    #[error("Parse error: {reason}")]
    Parse { reason: String },

    /// 目标文件不可写，或某个值无法用目标格式表示
    #[error("Export error: {reason}")]
    Export { reason: String },

    /// 访问了当前项目中不存在的分类/条目（调用方契约违规）
    #[error("Entry not found: {category}/{key}")]
    NotFound { category: String, key: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EditorError {
    pub fn parse(reason: impl Into<String>) -> Self {
        EditorError::Parse { reason: reason.into() }
    }

    pub fn export(reason: impl Into<String>) -> Self {
        EditorError::Export { reason: reason.into() }
    }

    pub fn not_found(category: &str, key: &str) -> Self {
        EditorError::NotFound {
            category: category.to_string(),
            key: key.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EditorError>;

/// 原子写入文件
///
/// 先写入目标目录下的临时文件，再重命名覆盖目标路径。
/// 失败时目标路径保持原样，不会出现写了一半的文件。
/// 父目录必须已存在。目标已存在时沿用其权限位。
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let mut temp = NamedTempFile::new_in(&dir)
        .map_err(|e| EditorError::export(format!("无法在 {:?} 创建临时文件: {}", dir, e)))?;
    temp.write_all(data)
        .and_then(|_| temp.as_file().sync_all())
        .map_err(|e| EditorError::export(format!("写入临时文件失败: {}", e)))?;

    // 临时文件默认只有所有者可读写
    match std::fs::metadata(path) {
        Ok(metadata) if metadata.is_file() => {
            temp.as_file()
                .set_permissions(metadata.permissions())
                .map_err(|e| EditorError::export(format!("无法设置 {:?} 的权限: {}", path, e)))?;
        }
        _ => {}
    }
    temp.persist(path)
        .map_err(|e| EditorError::export(format!("无法替换 {:?}: {}", path, e.error)))?;

    Ok(())
}

/// 创建文件备份
pub fn create_backup(file_path: &Path) -> Result<PathBuf> {
    if !file_path.exists() {
        return Err(EditorError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "原文件不存在",
        )));
    }

    let timestamp = chrono::Local::now().format("%Y-%m-%d-%H-%M-%S");
    let file_name = file_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("backup");
    let backup_path = file_path.with_file_name(format!("{}.{}.bak", file_name, timestamp));

    std::fs::copy(file_path, &backup_path)?;

    Ok(backup_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_atomic_write_replaces_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.assets.json");

        std::fs::write(&path, b"old").unwrap();
        atomic_write(&path, b"new content").unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"new content");
        // 只剩目标文件，没有遗留临时文件
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_atomic_write_missing_dir() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("out.json");

        let result = atomic_write(&path, b"data");
        assert!(matches!(result, Err(EditorError::Export { .. })));
        assert!(!path.exists());
    }

    #[test]
    fn test_atomic_write_failed_replace_keeps_destination() {
        let dir = TempDir::new().unwrap();
        // 目标是非空目录，重命名必然失败
        let path = dir.path().join("out.assets.json");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("keep.txt"), b"original").unwrap();

        let result = atomic_write(&path, b"new content");
        assert!(matches!(result, Err(EditorError::Export { .. })));

        assert!(path.is_dir());
        assert_eq!(std::fs::read(path.join("keep.txt")).unwrap(), b"original");
        assert_eq!(std::fs::read_dir(&path).unwrap().count(), 1);
        // 临时文件已被清理
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_atomic_write_keeps_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("resources.assets");
        std::fs::write(&path, b"old").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        atomic_write(&path, b"new").unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
        assert_eq!(std::fs::read(&path).unwrap(), b"new");
    }

    #[test]
    fn test_create_backup() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("resources.assets");
        std::fs::write(&path, b"RSRC").unwrap();

        let backup = create_backup(&path).unwrap();
        assert!(backup.exists());
        assert!(backup.to_string_lossy().ends_with(".bak"));
        assert_eq!(std::fs::read(&backup).unwrap(), b"RSRC");
    }

    #[test]
    fn test_create_backup_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = create_backup(&dir.path().join("nope.assets"));
        assert!(matches!(result, Err(EditorError::Io(_))));
    }
}
