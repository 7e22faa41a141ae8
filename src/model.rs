/// 资源模型模块
///
/// 内存中按分类组织的文本条目存储，负责编辑追踪与提交语义。
/// 所有修改仅作用于内存，需要通过格式适配器显式导出。
///
/// # 架构设计
///
/// - **content**: 单条文本（原文 + 可选编辑）及项目结构
/// - **resource_model**: 项目容器，提供读取/编辑/提交/重置
/// - **stats**: 项目统计信息
pub mod content;
pub mod resource_model;
pub mod stats;

// === 导出公共接口 ===
pub use content::{Content, EntryMap, Project};
pub use resource_model::{ResourceModel, SearchHit};
pub use stats::ProjectStats;
