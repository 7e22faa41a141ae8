use std::borrow::Cow;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::model::Project;

/// 游戏文本语言
///
/// 文本资源以语言前缀命名，例如 `EN_Town`、`ZH_Town`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TextLanguage {
    #[default]
    En,
    Zh,
}

impl TextLanguage {
    pub const ALL: [TextLanguage; 2] = [TextLanguage::En, TextLanguage::Zh];

    pub fn code(&self) -> &'static str {
        match self {
            TextLanguage::En => "EN",
            TextLanguage::Zh => "ZH",
        }
    }

    /// 资源名前缀
    pub fn prefix(&self) -> &'static str {
        match self {
            TextLanguage::En => "EN_",
            TextLanguage::Zh => "ZH_",
        }
    }

    /// 资源名是否属于该语言
    pub fn owns(&self, asset_name: &str) -> bool {
        asset_name.starts_with(self.prefix())
    }

    /// 从资源名前缀识别语言
    pub fn of_category(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|language| language.owns(name))
    }

    /// 从项目第一个分类识别源语言
    pub fn detect(project: &Project) -> Option<Self> {
        project.keys().next().and_then(|name| Self::of_category(name))
    }

    /// 将项目的分类名改写为目标语言前缀
    ///
    /// 源语言无法识别或与目标相同时原样返回。
    /// 改写后的分类与项目中已有的同名分类冲突时，保留改写后的分类并记录警告。
    pub fn retarget(project: &Project, target: TextLanguage) -> Cow<'_, Project> {
        let source = match Self::detect(project) {
            Some(source) if source != target => source,
            _ => return Cow::Borrowed(project),
        };

        let mut renamed = Project::new();
        let mut untouched = Vec::new();
        for (name, entries) in project {
            match name.strip_prefix(source.prefix()) {
                Some(rest) => {
                    renamed.insert(format!("{}{}", target.prefix(), rest), entries.clone());
                }
                None => untouched.push((name, entries)),
            }
        }

        for (name, entries) in untouched {
            if renamed.contains_key(name) {
                warn!("分类 {} 与 {} 分类改写后的名称冲突，已忽略", name, source);
                continue;
            }
            renamed.insert(name.clone(), entries.clone());
        }

        Cow::Owned(renamed)
    }
}

impl FromStr for TextLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EN" => Ok(TextLanguage::En),
            "ZH" => Ok(TextLanguage::Zh),
            other => Err(format!("不支持的文本语言: {}（可选 EN、ZH）", other)),
        }
    }
}

impl std::fmt::Display for TextLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
