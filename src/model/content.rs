use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// 分类内的条目映射（条目名 -> 内容）
pub type EntryMap = BTreeMap<String, Content>;

/// 项目：分类名 -> 条目映射
///
/// 只能由一次成功的解析整体产生，重新加载时整体替换。
pub type Project = BTreeMap<String, EntryMap>;

/// 单个条目的文本内容
///
/// 序列化形状与 JSON 镜像格式一致：
/// `{ "originalContent": string, "editedContent"?: string }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Content {
    /// 基线文本，只会被重新加载或提交改变
    #[serde(rename = "originalContent")]
    pub original_text: String,
    /// 用户编辑后的文本，未编辑时为 None
    #[serde(
        rename = "editedContent",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub edited_text: Option<String>,
}

impl Content {
    /// 创建未编辑的内容
    pub fn new(original_text: impl Into<String>) -> Self {
        Self {
            original_text: original_text.into(),
            edited_text: None,
        }
    }

    /// 存在编辑且与原文不同
    pub fn is_dirty(&self) -> bool {
        matches!(&self.edited_text, Some(edited) if *edited != self.original_text)
    }

    /// 当前应显示（以及导出到容器）的文本
    pub fn effective_text(&self) -> &str {
        self.edited_text.as_deref().unwrap_or(&self.original_text)
    }

    /// 将编辑折叠进基线，返回是否改变了基线
    ///
    /// 与原文相同的编辑被直接丢弃。
    pub(crate) fn fold(&mut self) -> bool {
        match self.edited_text.take() {
            Some(edited) if edited != self.original_text => {
                self.original_text = edited;
                true
            }
            _ => false,
        }
    }
}
