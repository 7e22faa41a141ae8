//! 编辑器配置
//!
//! JSON 文件，所有字段都有默认值；命令行参数优先于配置文件。

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::container::{ScriptCipher, TextLanguage};
use crate::format::ContainerCodec;
use crate::i18n::Language;
use crate::utils::Result;

/// 编辑器配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    /// 界面语言
    pub ui_language: Language,
    /// 读取与写回容器时使用的文本语言
    pub text_language: TextLanguage,
    /// 覆盖文件前是否先创建备份
    pub backup_before_export: bool,
    /// 日志过滤器（`RUST_LOG` 语法），`RUST_LOG` 环境变量优先
    pub log_filter: Option<String>,
    /// 覆盖默认脚本密钥（64 位十六进制）
    pub script_key: Option<String>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            ui_language: Language::Zh,
            text_language: TextLanguage::En,
            backup_before_export: false,
            log_filter: None,
            script_key: None,
        }
    }
}

impl EditorConfig {
    /// 读取配置文件；文件不存在时使用默认配置
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("配置文件 {:?} 不存在，使用默认配置", path);
            return Ok(Self::default());
        }

        let json = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&json)?;
        Ok(config)
    }

    /// 脚本加解密器
    pub fn cipher(&self) -> Result<ScriptCipher> {
        match &self.script_key {
            Some(hex) => ScriptCipher::from_hex(hex),
            None => Ok(ScriptCipher::default()),
        }
    }

    /// 按配置创建容器编解码器
    pub fn container_codec(&self) -> Result<ContainerCodec> {
        Ok(ContainerCodec::new(self.text_language, self.cipher()?))
    }
}
