//! 界面文本本地化
//!
//! 每种语言一个扁平的 `{ 键: 模板 }` 目录，编译时嵌入。
//! 模板中的 `{name}` 按字符串原样替换；找不到的键返回键本身。

mod keys;

pub use keys::UiKey;

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, OnceLock};

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// 嵌入的语言目录
const EMBEDDED_LOCALES: &[(Language, &str)] = &[
    (
        Language::En,
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/locales/en.json")),
    ),
    (
        Language::Zh,
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/locales/zh.json")),
    ),
];

/// 界面语言
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    #[default]
    Zh,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::Zh, Language::En];

    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Zh => "zh",
        }
    }

    /// 语言选择器中显示的名称
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Zh => "繁體中文（台灣）",
        }
    }
}

impl FromStr for Language {
    type Err = String;

    /// 不区分大小写，忽略地区后缀（如 `zh-TW`）
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        match normalized.split(['-', '_']).next().unwrap_or("") {
            "en" => Ok(Language::En),
            "zh" => Ok(Language::Zh),
            _ => Err(format!("不支持的界面语言: {}（可选 en、zh）", s.trim())),
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

type Catalog = HashMap<String, String>;

/// 本地化目录
///
/// 切换语言只替换当前目录的引用，不影响任何项目数据。
#[derive(Debug, Clone)]
pub struct LocalizationCatalog {
    catalogs: HashMap<Language, Arc<Catalog>>,
    language: Language,
    active: Arc<Catalog>,
}

impl LocalizationCatalog {
    /// 使用嵌入的目录创建
    pub fn new(language: Language) -> Self {
        let catalogs: HashMap<Language, Catalog> = EMBEDDED_LOCALES
            .iter()
            .map(|(language, json)| (*language, parse_catalog(*language, json)))
            .collect();
        Self::from_maps(catalogs, language)
    }

    /// 使用自定义目录创建；缺失的语言视为空目录
    pub fn from_maps(catalogs: HashMap<Language, Catalog>, language: Language) -> Self {
        let catalogs: HashMap<Language, Arc<Catalog>> = catalogs
            .into_iter()
            .map(|(language, catalog)| (language, Arc::new(catalog)))
            .collect();
        let active = catalogs.get(&language).cloned().unwrap_or_default();
        Self {
            catalogs,
            language,
            active,
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// 切换当前语言
    pub fn set_language(&mut self, language: Language) {
        self.active = self.catalogs.get(&language).cloned().unwrap_or_default();
        self.language = language;
    }

    /// 可选语言及其显示名称
    pub fn available_languages(&self) -> Vec<(Language, &'static str)> {
        Language::ALL
            .into_iter()
            .map(|language| (language, language.display_name()))
            .collect()
    }

    /// 解析已知的键
    ///
    /// # 参数
    /// * `key` - 文本键
    /// * `params` - 占位符替换，`("language", "EN")` 替换 `{language}`
    pub fn resolve(&self, key: UiKey, params: &[(&str, &str)]) -> String {
        self.resolve_str(key.as_str(), params)
    }

    /// 按字符串键解析；找不到时返回键本身
    pub fn resolve_str(&self, key: &str, params: &[(&str, &str)]) -> String {
        let template = match self.active.get(key) {
            Some(template) => template.as_str(),
            None => return key.to_string(),
        };

        substitute(template, params)
    }
}

impl Default for LocalizationCatalog {
    fn default() -> Self {
        Self::new(Language::default())
    }
}

/// 占位符：`{name}`
fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\{(\w+)\}").expect("placeholder pattern is valid"))
}

/// 单次扫描模板替换占位符；替换进来的值不会再被扫描
fn substitute(template: &str, params: &[(&str, &str)]) -> String {
    placeholder_pattern()
        .replace_all(template, |captures: &Captures| {
            let name = &captures[1];
            match params.iter().find(|(param, _)| *param == name) {
                Some((_, value)) => value.to_string(),
                None => captures[0].to_string(),
            }
        })
        .into_owned()
}

fn parse_catalog(language: Language, json: &str) -> Catalog {
    match serde_json::from_str::<Catalog>(json) {
        Ok(catalog) => catalog,
        Err(e) => {
            warn!("无法解析 {} 语言目录: {}", language, e);
            Catalog::new()
        }
    }
}
