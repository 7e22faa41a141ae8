/// 资源模型
///
/// 持有当前加载的项目，提供条目读取、编辑、还原和提交。
use tracing::debug;

use super::content::{Content, Project};
use super::stats::ProjectStats;
use crate::utils::{EditorError, Result};

/// 搜索结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit<'a> {
    pub category: &'a str,
    pub key: &'a str,
    pub content: &'a Content,
}

/// 资源模型 - 管理项目的编辑状态
///
/// # 核心特性
/// - **整体替换**: `load` 不与旧状态合并
/// - **脏标记**: 编辑与原文不同即为脏
/// - **单级还原**: 只支持还原到原文，不提供撤销/重做历史
///
/// # 使用示例
///
/// ```rust,ignore
/// let mut model = ResourceModel::new();
/// model.load(project);
/// model.set_edited("Town", "GREETING", "Hello");
/// model.commit();
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceModel {
    project: Project,
}

impl ResourceModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// 用新项目整体替换当前状态
    pub fn load(&mut self, project: Project) {
        debug!("加载项目: {} 个分类", project.len());
        self.project = project;
    }

    /// 获取条目内容
    ///
    /// # 错误
    /// 分类或条目不存在时返回 `NotFound`。调用方只应请求当前项目中存在的键。
    pub fn get_content(&self, category: &str, key: &str) -> Result<&Content> {
        self.project
            .get(category)
            .and_then(|entries| entries.get(key))
            .ok_or_else(|| EditorError::not_found(category, key))
    }

    /// 设置编辑文本
    ///
    /// 条目不存在时以 `text` 作为原文创建（首次写入即基线）。
    pub fn set_edited(&mut self, category: &str, key: &str, text: impl Into<String>) {
        let text = text.into();
        let entries = self.project.entry(category.to_string()).or_default();
        match entries.get_mut(key) {
            Some(content) => content.edited_text = Some(text),
            None => {
                debug!("创建新条目: {}/{}", category, key);
                entries.insert(
                    key.to_string(),
                    Content {
                        original_text: text.clone(),
                        edited_text: Some(text),
                    },
                );
            }
        }
    }

    /// 还原到原文（丢弃编辑）
    pub fn revert(&mut self, category: &str, key: &str) -> Result<()> {
        let content = self
            .project
            .get_mut(category)
            .and_then(|entries| entries.get_mut(key))
            .ok_or_else(|| EditorError::not_found(category, key))?;
        content.edited_text = None;
        Ok(())
    }

    /// 提交所有编辑
    ///
    /// 脏条目的编辑文本成为新原文；与原文相同的编辑被丢弃。
    /// 返回改变了基线的条目数量，重复调用为空操作。
    pub fn commit(&mut self) -> usize {
        let folded = self
            .project
            .values_mut()
            .flat_map(|entries| entries.values_mut())
            .map(Content::fold)
            .filter(|&changed| changed)
            .count();
        debug!("提交完成: {} 个条目", folded);
        folded
    }

    /// 清空为空项目
    pub fn reset(&mut self) {
        self.project.clear();
    }

    /// 当前项目
    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn is_empty(&self) -> bool {
        self.project.is_empty()
    }

    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.project.keys().map(String::as_str)
    }

    pub fn entry_count(&self) -> usize {
        self.project.values().map(|entries| entries.len()).sum()
    }

    /// 是否存在未提交的编辑
    pub fn is_dirty(&self) -> bool {
        self.dirty_entries().next().is_some()
    }

    pub fn dirty_count(&self) -> usize {
        self.dirty_entries().count()
    }

    /// 遍历所有脏条目（按项目顺序）
    pub fn dirty_entries(&self) -> impl Iterator<Item = SearchHit<'_>> {
        self.hits().filter(|hit| hit.content.is_dirty())
    }

    /// 按名称或文本搜索（不区分大小写），可选按分类过滤
    ///
    /// 空查询匹配全部条目。
    pub fn search<'a>(&'a self, query: &str, category: Option<&'a str>) -> Vec<SearchHit<'a>> {
        let needle = query.to_lowercase();
        self.hits()
            .filter(|hit| category.map_or(true, |c| hit.category == c))
            .filter(|hit| {
                needle.is_empty()
                    || hit.key.to_lowercase().contains(&needle)
                    || hit.content.original_text.to_lowercase().contains(&needle)
                    || hit
                        .content
                        .edited_text
                        .as_ref()
                        .is_some_and(|t| t.to_lowercase().contains(&needle))
            })
            .collect()
    }

    /// 生成统计信息
    pub fn stats(&self) -> ProjectStats {
        ProjectStats {
            category_count: self.project.len(),
            entry_count: self.entry_count(),
            dirty_count: self.dirty_count(),
            pending_edit_count: self
                .hits()
                .filter(|hit| hit.content.edited_text.is_some())
                .count(),
            total_text_size: self
                .hits()
                .map(|hit| hit.content.effective_text().len())
                .sum(),
        }
    }

    fn hits(&self) -> impl Iterator<Item = SearchHit<'_>> {
        self.project.iter().flat_map(|(category, entries)| {
            entries.iter().map(move |(key, content)| SearchHit {
                category: category.as_str(),
                key: key.as_str(),
                content,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EntryMap;

    fn town_project() -> Project {
        let mut entries = EntryMap::new();
        entries.insert("GREETING".to_string(), Content::new("Hi"));
        entries.insert("FAREWELL".to_string(), Content::new("Bye"));

        let mut project = Project::new();
        project.insert("Town".to_string(), entries);
        project
    }

    fn loaded_model() -> ResourceModel {
        let mut model = ResourceModel::new();
        model.load(town_project());
        model
    }

    #[test]
    fn test_loaded_content_is_clean() {
        let model = loaded_model();
        let content = model.get_content("Town", "GREETING").unwrap();
        assert!(!content.is_dirty());
        assert_eq!(content.effective_text(), "Hi");
        assert!(!model.is_dirty());
    }

    #[test]
    fn test_edit_then_commit_scenario() {
        let mut model = loaded_model();

        model.set_edited("Town", "GREETING", "Hello");
        let content = model.get_content("Town", "GREETING").unwrap();
        assert!(content.is_dirty());
        assert_eq!(content.edited_text.as_deref(), Some("Hello"));

        assert_eq!(model.commit(), 1);
        let content = model.get_content("Town", "GREETING").unwrap();
        assert_eq!(content.original_text, "Hello");
        assert!(content.edited_text.is_none());
        assert!(!content.is_dirty());
    }

    #[test]
    fn test_edit_back_to_original_is_clean() {
        let mut model = loaded_model();
        model.set_edited("Town", "GREETING", "Hi");

        let content = model.get_content("Town", "GREETING").unwrap();
        assert_eq!(content.edited_text.as_deref(), Some("Hi"));
        assert!(!content.is_dirty());
    }

    #[test]
    fn test_commit_idempotent() {
        let mut model = loaded_model();
        model.set_edited("Town", "GREETING", "Hello");
        model.set_edited("Town", "FAREWELL", "Bye");

        model.commit();
        let once = model.clone();
        assert_eq!(model.commit(), 0);
        assert_eq!(model, once);
        // 与原文相同的编辑也被清除
        assert!(model.get_content("Town", "FAREWELL").unwrap().edited_text.is_none());
    }

    #[test]
    fn test_get_content_missing() {
        let model = loaded_model();
        assert!(matches!(
            model.get_content("Town", "MISSING"),
            Err(EditorError::NotFound { .. })
        ));
        assert!(matches!(
            model.get_content("Nowhere", "GREETING"),
            Err(EditorError::NotFound { .. })
        ));
    }

    #[test]
    fn test_set_edited_creates_entry() {
        let mut model = loaded_model();
        model.set_edited("Greenpath", "HORNET", "...SHAW!");

        let content = model.get_content("Greenpath", "HORNET").unwrap();
        assert_eq!(content.original_text, "...SHAW!");
        assert!(!content.is_dirty());
    }

    #[test]
    fn test_revert() {
        let mut model = loaded_model();
        model.set_edited("Town", "GREETING", "Hello");
        model.revert("Town", "GREETING").unwrap();

        assert_eq!(
            model.get_content("Town", "GREETING").unwrap(),
            &Content::new("Hi")
        );
        assert!(model.revert("Town", "MISSING").is_err());
    }

    #[test]
    fn test_load_replaces_wholesale() {
        let mut model = loaded_model();
        model.set_edited("Town", "GREETING", "Hello");

        let mut other = Project::new();
        other.insert("Deepnest".to_string(), EntryMap::new());
        model.load(other);

        assert!(model.get_content("Town", "GREETING").is_err());
        assert_eq!(model.category_names().collect::<Vec<_>>(), vec!["Deepnest"]);
    }

    #[test]
    fn test_reset() {
        let mut model = loaded_model();
        model.reset();
        assert!(model.is_empty());
        assert_eq!(model.entry_count(), 0);
    }

    #[test]
    fn test_search() {
        let mut model = loaded_model();
        model.set_edited("Town", "FAREWELL", "See you");

        assert_eq!(model.search("greet", None).len(), 1);
        assert_eq!(model.search("see YOU", None)[0].key, "FAREWELL");
        assert_eq!(model.search("", Some("Town")).len(), 2);
        assert!(model.search("", Some("Deepnest")).is_empty());
    }

    #[test]
    fn test_dirty_entries_and_stats() {
        let mut model = loaded_model();
        model.set_edited("Town", "GREETING", "Hello");
        model.set_edited("Town", "FAREWELL", "Bye");

        let dirty: Vec<_> = model.dirty_entries().map(|hit| hit.key).collect();
        assert_eq!(dirty, vec!["GREETING"]);

        let stats = model.stats();
        assert_eq!(stats.category_count, 1);
        assert_eq!(stats.entry_count, 2);
        assert_eq!(stats.dirty_count, 1);
        assert_eq!(stats.pending_edit_count, 2);
        assert_eq!(stats.total_text_size, "Hello".len() + "Bye".len());
    }
}
