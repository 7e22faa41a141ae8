//! 资源容器模块
//!
//! 负责打包资源容器中对话文本的读取与拼接写回。
//!
//! # 架构设计
//!
//! - **layout**: 文件头与对象表解析、边界验证
//! - **text_asset**: 文本资源对象体（名称、脚本、尾部字节）
//! - **crypto**: 脚本加解密
//! - **entries**: 脚本内的条目标记
//! - **language**: 资源名语言前缀
//! - **splice**: 拼接写回，保持未修改区域逐字节不变
mod crypto;
mod entries;
mod language;
mod layout;
mod splice;
mod text_asset;


use std::collections::{HashMap, HashSet};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::model::{Content, EntryMap, Project};
use crate::utils::{EditorError, Result};

pub use crypto::{ScriptCipher, DEFAULT_SCRIPT_KEY};
pub use entries::EntryList;
pub use language::TextLanguage;
pub use layout::{ContainerHeader, ContainerLayout, ObjectInfo, TEXT_ASSET_CLASS_ID};
pub use text_asset::TextAsset;

/// 写回结果摘要
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpliceReport {
    /// 被重写的文本资源数量
    pub assets_updated: usize,
    /// 文本发生变化的条目数量
    pub entries_updated: usize,
    /// 容器中找不到的分类
    pub unknown_categories: Vec<String>,
    /// 资源脚本中找不到而被忽略的条目数量
    pub ignored_entries: usize,
}

/// 从容器字节中读取指定语言的全部对话
pub fn read_project(data: &[u8], language: TextLanguage, cipher: &ScriptCipher) -> Result<Project> {
    let layout = ContainerLayout::parse(data)?;

    let candidates: Vec<&ObjectInfo> = layout.text_assets().collect();
    debug!("容器包含 {} 个对象，其中 {} 个文本资源", layout.objects.len(), candidates.len());

    // 并行解密与解析
    let scenes: Result<Vec<Option<(String, EntryMap)>>> = candidates
        .par_iter()
        .map(|object| -> Result<Option<(String, EntryMap)>> {
            let body = layout.object_data(data, object);
            let name = TextAsset::peek_name(body)?;
            if !language.owns(&name) {
                return Ok(None);
            }

            let asset = TextAsset::parse(body)?;
            let markup = cipher
                .decrypt(&asset.script)
                .map_err(|e| EditorError::parse(format!("{}: {}", name, reason_of(&e))))?;

            let entries: EntryMap = EntryList::parse(&markup)
                .iter()
                .map(|(key, text)| (key.to_string(), Content::new(text)))
                .collect();
            Ok(Some((name, entries)))
        })
        .collect();

    let mut project = Project::new();
    for (name, entries) in scenes?.into_iter().flatten() {
        if project.insert(name.clone(), entries).is_some() {
            warn!("重复的文本资源名称: {}，使用后出现的内容", name);
        }
    }

    info!(
        "读取 {} 个 {} 分类，共 {} 个条目",
        project.len(),
        language,
        project.values().map(|entries| entries.len()).sum::<usize>()
    );
    Ok(project)
}

/// 将项目写回容器模板，返回新的容器字节
///
/// 只更新模板中已存在的分类与条目；未变化的文本资源保持原始字节。
pub fn write_project(
    template: &[u8],
    project: &Project,
    cipher: &ScriptCipher,
) -> Result<(Vec<u8>, SpliceReport)> {
    let layout = ContainerLayout::parse(template)
        .map_err(|e| EditorError::export(format!("目标不是有效的容器: {}", reason_of(&e))))?;

    let candidates: Vec<&ObjectInfo> = layout.text_assets().collect();
    let updates: Result<Vec<Option<AssetUpdate>>> = candidates
        .par_iter()
        .map(|object| update_asset(layout.object_data(template, object), object.index, project, cipher))
        .collect();

    let mut report = SpliceReport::default();
    let mut replacements = HashMap::new();
    let mut matched = HashSet::new();

    for update in updates?.into_iter().flatten() {
        report.ignored_entries += update.ignored;
        if let Some(body) = update.body {
            report.assets_updated += 1;
            report.entries_updated += update.changed;
            replacements.insert(update.index, body);
        }
        matched.insert(update.name);
    }

    report.unknown_categories = project
        .keys()
        .filter(|name| !matched.contains(*name))
        .cloned()
        .collect();
    if !report.unknown_categories.is_empty() {
        warn!("容器中找不到以下分类，已忽略: {:?}", report.unknown_categories);
    }
    if report.ignored_entries > 0 {
        warn!("{} 个条目在资源脚本中不存在，已忽略", report.ignored_entries);
    }

    let output = splice::splice(template, &layout, &replacements)?;
    Ok((output, report))
}

/// 单个文本资源的写回结果
struct AssetUpdate {
    index: usize,
    name: String,
    /// 有变化时的新对象体
    body: Option<Vec<u8>>,
    changed: usize,
    ignored: usize,
}

fn update_asset(
    body: &[u8],
    index: usize,
    project: &Project,
    cipher: &ScriptCipher,
) -> Result<Option<AssetUpdate>> {
    let mut asset = TextAsset::parse(body).map_err(as_export)?;
    let scene = match project.get(&asset.name) {
        Some(scene) => scene,
        None => return Ok(None),
    };

    let markup = cipher
        .decrypt(&asset.script)
        .map_err(|e| EditorError::export(format!("{}: {}", asset.name, reason_of(&e))))?;
    let mut list = EntryList::parse(&markup);

    let mut changed = 0;
    let mut ignored = 0;
    for (key, content) in scene {
        let text = content.effective_text();
        if list.get(key).is_none() {
            ignored += 1;
            continue;
        }
        entries::check_representable(text)
            .map_err(|reason| EditorError::export(format!("{}/{}: {}", asset.name, key, reason)))?;
        if list.set(key, text) {
            changed += 1;
        }
    }

    let body = if changed > 0 {
        asset.script = cipher.encrypt(&list.render());
        Some(asset.encode().map_err(as_export)?)
    } else {
        None
    };

    Ok(Some(AssetUpdate {
        index,
        name: asset.name,
        body,
        changed,
        ignored,
    }))
}

fn reason_of(error: &EditorError) -> String {
    match error {
        EditorError::Parse { reason } | EditorError::Export { reason } => reason.clone(),
        other => other.to_string(),
    }
}

fn as_export(error: EditorError) -> EditorError {
    EditorError::export(reason_of(&error))
}
