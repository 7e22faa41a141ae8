/// 文件格式适配层
///
/// 两种文件格式通过同一个 `FormatAdapter` 接口接入编辑会话。
///
/// # 架构设计
///
/// - **traits**: 定义 `FormatAdapter` 接口
/// - **file_format**: 扩展名识别与适配器选择
/// - **container_codec**: 打包资源容器（二进制）
/// - **sidecar**: JSON 镜像文件
///
/// # 使用示例
///
/// ```rust,ignore
/// use dialogue_editor::format::{AdapterSet, FileFormat};
///
/// let adapters = AdapterSet::default();
/// let project = adapters.for_format(FileFormat::Sidecar).parse(Path::new("town.assets.json"))?;
/// ```
pub mod traits;
pub mod file_format;
pub mod container_codec;
pub mod sidecar;

// === 导出 trait 定义 ===
pub use traits::FormatAdapter;

// === 导出默认实现 ===
pub use container_codec::ContainerCodec;
pub use file_format::{AdapterSet, FileFormat};
pub use sidecar::SidecarCodec;
