use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::container_codec::ContainerCodec;
use super::sidecar::SidecarCodec;
use super::traits::FormatAdapter;

/// 支持的文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    /// 打包资源容器（`.assets`）
    Container,
    /// JSON 镜像文件（`.assets.json`）
    Sidecar,
}

impl FileFormat {
    pub const ALL: [FileFormat; 2] = [FileFormat::Container, FileFormat::Sidecar];

    /// 根据扩展名识别格式（不区分大小写）
    ///
    /// 只用于给出默认值；用户选择的格式总是优先。
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?.to_lowercase();
        if name.ends_with(".assets.json") {
            Some(FileFormat::Sidecar)
        } else if name.ends_with(".assets") {
            Some(FileFormat::Container)
        } else {
            None
        }
    }

    /// 标准扩展名（不含前导点）
    pub fn extension(&self) -> &'static str {
        match self {
            FileFormat::Container => "assets",
            FileFormat::Sidecar => "assets.json",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FileFormat::Container => "container",
            FileFormat::Sidecar => "sidecar",
        }
    }
}

impl FromStr for FileFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "container" | "assets" => Ok(FileFormat::Container),
            "sidecar" | "json" => Ok(FileFormat::Sidecar),
            other => Err(format!("不支持的文件格式: {}（可选 container、sidecar）", other)),
        }
    }
}

impl std::fmt::Display for FileFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// 格式到适配器的映射
#[derive(Clone)]
pub struct AdapterSet {
    container: Arc<dyn FormatAdapter>,
    sidecar: Arc<dyn FormatAdapter>,
}

impl AdapterSet {
    pub fn new(container: ContainerCodec, sidecar: SidecarCodec) -> Self {
        Self {
            container: Arc::new(container),
            sidecar: Arc::new(sidecar),
        }
    }

    /// 替换适配器，按其 `format()` 决定位置
    pub fn with_adapter(mut self, adapter: Arc<dyn FormatAdapter>) -> Self {
        match adapter.format() {
            FileFormat::Container => self.container = adapter,
            FileFormat::Sidecar => self.sidecar = adapter,
        }
        self
    }

    pub fn for_format(&self, format: FileFormat) -> Arc<dyn FormatAdapter> {
        match format {
            FileFormat::Container => Arc::clone(&self.container),
            FileFormat::Sidecar => Arc::clone(&self.sidecar),
        }
    }
}

impl Default for AdapterSet {
    fn default() -> Self {
        Self::new(ContainerCodec::default(), SidecarCodec)
    }
}

impl std::fmt::Debug for AdapterSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterSet").finish_non_exhaustive()
    }
}
