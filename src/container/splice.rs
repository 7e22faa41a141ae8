/// 容器拼接写入
///
/// 用新的对象体替换部分对象，其余字节原样复制。
/// 被替换对象之后的对象整体平移，平移量保持 8 字节对齐；
/// 只有对象表中的 offset/size 字段和文件头中的文件大小会被改写。
use std::collections::HashMap;

use byteorder::{ByteOrder, LittleEndian};
use tracing::debug;

use super::layout::{ContainerLayout, FILE_SIZE_FIELD, OBJECT_ALIGNMENT, OFFSET_FIELD, SIZE_FIELD};
use crate::utils::{EditorError, Result};

/// 按对象表序号替换对象体，返回新的容器字节
pub fn splice(
    data: &[u8],
    layout: &ContainerLayout,
    replacements: &HashMap<usize, Vec<u8>>,
) -> Result<Vec<u8>> {
    let data_start = layout.header.data_offset as usize;

    let mut output = Vec::with_capacity(
        data.len() + replacements.values().map(|body| body.len() + OBJECT_ALIGNMENT).sum::<usize>(),
    );
    // 文件头、对象表以及数据区之前的所有字节
    output.extend_from_slice(&data[..data_start]);

    let mut placements = Vec::with_capacity(layout.objects.len());
    let mut position = data_start;

    for object in layout.objects_by_offset() {
        let range = layout.object_range(object);

        // 对象之间的间隙原样保留
        output.extend_from_slice(&data[position..range.start]);
        let new_offset = output.len() - data_start;

        let new_size = match replacements.get(&object.index) {
            Some(body) => {
                output.extend_from_slice(body);
                let pad = alignment_padding(body.len(), range.len());
                output.resize(output.len() + pad, 0);
                debug!(
                    "替换对象 {}: {} -> {} 字节（填充 {}）",
                    object.path_id,
                    range.len(),
                    body.len(),
                    pad
                );
                body.len()
            }
            None => {
                output.extend_from_slice(&data[range.clone()]);
                range.len()
            }
        };

        placements.push((object, new_offset, new_size));
        position = range.end;
    }

    // 最后一个对象之后的字节
    output.extend_from_slice(&data[position..]);

    let file_size = to_u32(output.len(), "容器大小")?;
    LittleEndian::write_u32(&mut output[FILE_SIZE_FIELD..FILE_SIZE_FIELD + 4], file_size);

    for (object, offset, size) in placements {
        let entry = layout.table_entry_position(object);
        let offset = to_u32(offset, "对象偏移")?;
        let size = to_u32(size, "对象大小")?;
        LittleEndian::write_u32(&mut output[entry + OFFSET_FIELD..entry + OFFSET_FIELD + 4], offset);
        LittleEndian::write_u32(&mut output[entry + SIZE_FIELD..entry + SIZE_FIELD + 4], size);
    }

    Ok(output)
}

/// 使长度变化量成为对齐值整数倍所需的补零字节数
fn alignment_padding(new_len: usize, old_len: usize) -> usize {
    let diff = new_len as i64 - old_len as i64;
    let alignment = OBJECT_ALIGNMENT as i64;
    ((alignment - diff.rem_euclid(alignment)) % alignment) as usize
}

fn to_u32(value: usize, what: &str) -> Result<u32> {
    u32::try_from(value).map_err(|_| EditorError::export(format!("{}超出 4 GiB 限制", what)))
}
