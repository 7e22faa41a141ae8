/// 打包资源容器编解码器
///
/// 解析时只读取配置语言的文本资源；导出时以目标位置现有的容器为模板拼接写回。
use std::fs::File;
use std::path::Path;

use memmap2::Mmap;
use tracing::{debug, info};

use super::file_format::FileFormat;
use super::traits::FormatAdapter;
use crate::container::{self, ScriptCipher, TextLanguage};
use crate::model::Project;
use crate::utils::{atomic_write, EditorError, Result};

/// 容器编解码器
#[derive(Debug, Clone, Default)]
pub struct ContainerCodec {
    /// 读取与写回的文本语言
    pub language: TextLanguage,
    /// 脚本加解密器
    pub cipher: ScriptCipher,
}

impl ContainerCodec {
    pub fn new(language: TextLanguage, cipher: ScriptCipher) -> Self {
        Self { language, cipher }
    }

    pub fn with_language(language: TextLanguage) -> Self {
        Self {
            language,
            ..Self::default()
        }
    }
}

/// 只读映射文件；空文件无法映射，直接报告
fn map_file(path: &Path) -> std::io::Result<Option<Mmap>> {
    let file = File::open(path)?;
    if file.metadata()?.len() == 0 {
        return Ok(None);
    }
    // 映射期间文件只被读取
    let mmap = unsafe { Mmap::map(&file)? };
    Ok(Some(mmap))
}

impl FormatAdapter for ContainerCodec {
    fn parse(&self, path: &Path) -> Result<Project> {
        let mmap = map_file(path)
            .map_err(|e| EditorError::parse(format!("无法读取 {:?}: {}", path, e)))?
            .ok_or_else(|| EditorError::parse("文件为空"))?;

        debug!("映射容器 {:?}: {} 字节", path, mmap.len());
        container::read_project(&mmap[..], self.language, &self.cipher)
    }

    fn export(&self, project: &Project, path: &Path) -> Result<()> {
        if !path.is_file() {
            return Err(EditorError::export(format!(
                "目标容器不存在: {:?}（导出需要以现有容器为模板）",
                path
            )));
        }

        let project = TextLanguage::retarget(project, self.language);

        let (output, report) = {
            let mmap = map_file(path)
                .map_err(|e| EditorError::export(format!("无法读取 {:?}: {}", path, e)))?
                .ok_or_else(|| EditorError::export("目标容器为空"))?;
            container::write_project(&mmap[..], &project, &self.cipher)?
        };

        atomic_write(path, &output)?;
        info!(
            "写回 {:?}: 更新 {} 个文本资源，{} 个条目",
            path, report.assets_updated, report.entries_updated
        );
        Ok(())
    }

    fn format(&self) -> FileFormat {
        FileFormat::Container
    }
}
