/// 项目统计信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectStats {
    pub category_count: usize,
    pub entry_count: usize,
    /// 编辑与原文不同的条目数
    pub dirty_count: usize,
    /// 带有编辑文本的条目数（包括与原文相同的编辑）
    pub pending_edit_count: usize,
    /// 当前文本总字节数
    pub total_text_size: usize,
}

impl std::fmt::Display for ProjectStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== 项目统计信息 ===")?;
        writeln!(f, "分类数量: {}", self.category_count)?;
        writeln!(f, "条目数量: {}", self.entry_count)?;
        writeln!(f, "已修改条目: {}", self.dirty_count)?;
        writeln!(f, "待提交编辑: {}", self.pending_edit_count)?;
        writeln!(f, "文本总大小: {} 字节", self.total_text_size)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let stats = ProjectStats {
            category_count: 2,
            entry_count: 5,
            dirty_count: 1,
            pending_edit_count: 1,
            total_text_size: 42,
        };
        let report = stats.to_string();
        assert!(report.contains("分类数量: 2"));
        assert!(report.contains("条目数量: 5"));
        assert!(report.contains("42 字节"));
    }
}
