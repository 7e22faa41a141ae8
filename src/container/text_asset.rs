use std::io::{Cursor, Read};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use super::layout::align_to;
use crate::utils::{EditorError, Result};

/// 文本资源对象
///
/// 对象体结构：对齐字符串 name、对齐字符串 script、其余尾部字节。
/// 对齐字符串 = u32 长度 + 字节 + 补零到 4 字节边界（相对对象起点）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextAsset {
    pub name: String,
    /// 加密后的脚本（base64 文本字节）
    pub script: Vec<u8>,
    /// 脚本之后的原始字节，重写时原样保留
    pub tail: Vec<u8>,
}

impl TextAsset {
    /// 解析对象体
    pub fn parse(body: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(body);

        let name_bytes = read_aligned_bytes(&mut cursor)?;
        let name = String::from_utf8(name_bytes)
            .map_err(|_| EditorError::parse("文本资源名称不是有效的 UTF-8"))?;
        let script = read_aligned_bytes(&mut cursor)?;

        let tail = body[cursor.position() as usize..].to_vec();

        Ok(TextAsset { name, script, tail })
    }

    /// 仅读取名称（无需完整解析）
    pub fn peek_name(body: &[u8]) -> Result<String> {
        let mut cursor = Cursor::new(body);
        let name_bytes = read_aligned_bytes(&mut cursor)?;
        String::from_utf8(name_bytes).map_err(|_| EditorError::parse("文本资源名称不是有效的 UTF-8"))
    }

    /// 编码为对象体
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::with_capacity(
            8 + align_to(self.name.len(), 4) + align_to(self.script.len(), 4) + self.tail.len(),
        );
        write_aligned_bytes(&mut buffer, self.name.as_bytes())?;
        write_aligned_bytes(&mut buffer, &self.script)?;
        buffer.extend_from_slice(&self.tail);
        Ok(buffer)
    }
}

fn read_aligned_bytes(cursor: &mut Cursor<&[u8]>) -> Result<Vec<u8>> {
    let length = cursor
        .read_u32::<LittleEndian>()
        .map_err(|_| EditorError::parse("文本资源被截断: 缺少长度字段"))? as usize;

    let remaining = cursor.get_ref().len() - cursor.position() as usize;
    if length > remaining {
        return Err(EditorError::parse(format!(
            "文本资源被截断: 需要 {} 字节，剩余 {} 字节",
            length, remaining
        )));
    }

    let mut bytes = vec![0u8; length];
    cursor.read_exact(&mut bytes)?;

    let aligned = align_to(cursor.position() as usize, 4).min(cursor.get_ref().len());
    cursor.set_position(aligned as u64);

    Ok(bytes)
}

fn write_aligned_bytes(buffer: &mut Vec<u8>, bytes: &[u8]) -> Result<()> {
    let length = u32::try_from(bytes.len())
        .map_err(|_| EditorError::export("字符串长度超出 u32 范围"))?;
    buffer.write_u32::<LittleEndian>(length)?;
    buffer.extend_from_slice(bytes);
    buffer.resize(align_to(buffer.len(), 4), 0);
    Ok(())
}
