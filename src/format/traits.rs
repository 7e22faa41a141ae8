/// 格式适配器 trait 定义
///
/// 编辑会话只依赖该接口，便于注入测试用的适配器。

use std::path::Path;

use super::file_format::FileFormat;
use crate::model::Project;
use crate::utils::Result;

/// 文件格式适配器
///
/// # 职责
/// - 将文件解析为完整的项目
/// - 将项目写出为目标格式
///
/// # 约定
/// - `parse` 失败时返回 `EditorError::Parse`，调用方的模型保持不变
/// - `export` 失败时返回 `EditorError::Export`，目标文件不会被部分写入
/// - 同一实例可能被多个线程同时使用
pub trait FormatAdapter: Send + Sync {
    /// 解析文件
    ///
    /// # 参数
    /// * `path` - 源文件路径
    ///
    /// # 返回
    /// 返回文件中的全部分类与条目
    fn parse(&self, path: &Path) -> Result<Project>;

    /// 导出项目
    ///
    /// # 参数
    /// * `project` - 要写出的项目（已提交的快照）
    /// * `path` - 目标文件路径
    fn export(&self, project: &Project, path: &Path) -> Result<()>;

    /// 适配器处理的格式
    fn format(&self) -> FileFormat;
}
