/// 容器布局解析
///
/// 文件结构（小端序）：
///
/// ```text
/// 文件头（32 字节）
///   0  签名         [u8; 4] = "RSRC"
///   4  版本         u32
///   8  对象数量     u32
///   12 对象表偏移   u32
///   16 数据区偏移   u32
///   20 文件大小     u32
///   24 保留         [u8; 8]
/// 对象表（每项 24 字节）
///   path_id  i64
///   class_id u32
///   offset   u32（相对数据区）
///   size     u32
///   flags    u32
/// 数据区
/// ```
use std::io::Cursor;
use std::ops::Range;

use byteorder::{LittleEndian, ReadBytesExt};

use crate::utils::{EditorError, Result};

pub const SIGNATURE: &[u8; 4] = b"RSRC";
pub const SUPPORTED_VERSION: u32 = 1;
pub const HEADER_SIZE: usize = 32;
pub const OBJECT_ENTRY_SIZE: usize = 24;
/// 文本资源的类型 ID
pub const TEXT_ASSET_CLASS_ID: u32 = 49;
/// 数据区对象对齐
pub const OBJECT_ALIGNMENT: usize = 8;

/// 文件头中文件大小字段的位置
pub(crate) const FILE_SIZE_FIELD: usize = 20;
/// 对象表项内 offset/size 字段的相对位置
pub(crate) const OFFSET_FIELD: usize = 12;
pub(crate) const SIZE_FIELD: usize = 16;

/// 容器文件头
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerHeader {
    pub version: u32,
    pub object_count: u32,
    pub table_offset: u32,
    pub data_offset: u32,
    pub file_size: u32,
}

/// 对象表项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectInfo {
    /// 在对象表中的序号
    pub index: usize,
    pub path_id: i64,
    pub class_id: u32,
    pub offset: u32,
    pub size: u32,
    pub flags: u32,
}

impl ObjectInfo {
    pub fn is_text_asset(&self) -> bool {
        self.class_id == TEXT_ASSET_CLASS_ID
    }
}

/// 已验证的容器布局
#[derive(Debug, Clone)]
pub struct ContainerLayout {
    pub header: ContainerHeader,
    /// 按对象表顺序
    pub objects: Vec<ObjectInfo>,
}

impl ContainerLayout {
    /// 解析并验证容器布局
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_SIZE {
            return Err(EditorError::parse(format!(
                "文件头被截断: 只有 {} 字节",
                data.len()
            )));
        }
        if &data[..4] != SIGNATURE {
            return Err(EditorError::parse("无效的容器签名"));
        }

        let mut cursor = Cursor::new(&data[4..HEADER_SIZE]);
        let header = ContainerHeader {
            version: cursor.read_u32::<LittleEndian>()?,
            object_count: cursor.read_u32::<LittleEndian>()?,
            table_offset: cursor.read_u32::<LittleEndian>()?,
            data_offset: cursor.read_u32::<LittleEndian>()?,
            file_size: cursor.read_u32::<LittleEndian>()?,
        };

        if header.version != SUPPORTED_VERSION {
            return Err(EditorError::parse(format!(
                "不支持的容器版本: {}",
                header.version
            )));
        }
        if header.file_size as usize != data.len() {
            return Err(EditorError::parse(format!(
                "文件大小不匹配: 声明 {} 字节，实际 {} 字节",
                header.file_size,
                data.len()
            )));
        }

        let table_start = header.table_offset as usize;
        let table_end = header.object_count as u64 * OBJECT_ENTRY_SIZE as u64 + table_start as u64;
        if table_start < HEADER_SIZE || table_end > data.len() as u64 {
            return Err(EditorError::parse("对象表超出文件边界"));
        }
        if table_end > header.data_offset as u64 || header.data_offset as usize > data.len() {
            return Err(EditorError::parse("对象表与数据区重叠"));
        }

        let mut cursor = Cursor::new(&data[table_start..table_end as usize]);
        let mut objects = Vec::with_capacity(header.object_count as usize);
        for index in 0..header.object_count as usize {
            let object = ObjectInfo {
                index,
                path_id: cursor.read_i64::<LittleEndian>()?,
                class_id: cursor.read_u32::<LittleEndian>()?,
                offset: cursor.read_u32::<LittleEndian>()?,
                size: cursor.read_u32::<LittleEndian>()?,
                flags: cursor.read_u32::<LittleEndian>()?,
            };

            let end = header.data_offset as u64 + object.offset as u64 + object.size as u64;
            if end > data.len() as u64 {
                return Err(EditorError::parse(format!(
                    "对象 {} 超出文件边界",
                    object.path_id
                )));
            }
            objects.push(object);
        }

        let layout = ContainerLayout { header, objects };
        layout.check_overlaps()?;
        Ok(layout)
    }

    /// 对象在文件中的绝对范围
    pub fn object_range(&self, object: &ObjectInfo) -> Range<usize> {
        let start = self.header.data_offset as usize + object.offset as usize;
        start..start + object.size as usize
    }

    /// 对象数据
    pub fn object_data<'a>(&self, data: &'a [u8], object: &ObjectInfo) -> &'a [u8] {
        &data[self.object_range(object)]
    }

    /// 按数据偏移排序的对象
    pub fn objects_by_offset(&self) -> Vec<&ObjectInfo> {
        let mut sorted: Vec<&ObjectInfo> = self.objects.iter().collect();
        sorted.sort_by_key(|object| object.offset);
        sorted
    }

    pub fn text_assets(&self) -> impl Iterator<Item = &ObjectInfo> {
        self.objects.iter().filter(|object| object.is_text_asset())
    }

    /// 对象表项在文件中的位置
    pub(crate) fn table_entry_position(&self, object: &ObjectInfo) -> usize {
        self.header.table_offset as usize + object.index * OBJECT_ENTRY_SIZE
    }

    fn check_overlaps(&self) -> Result<()> {
        let mut previous_end = 0u64;
        for object in self.objects_by_offset() {
            if (object.offset as u64) < previous_end {
                return Err(EditorError::parse(format!(
                    "对象 {} 与前一个对象重叠",
                    object.path_id
                )));
            }
            previous_end = object.offset as u64 + object.size as u64;
        }
        Ok(())
    }
}

/// 向上对齐
pub(crate) fn align_to(value: usize, alignment: usize) -> usize {
    value.div_ceil(alignment) * alignment
}
