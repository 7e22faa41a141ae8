//! 脚本加解密
//!
//! 文本资源的脚本内容为 base64(AES-256-ECB(PKCS#7(UTF-8 标记文本)))。

use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use aes::{Aes256, Block};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use encoding_rs::UTF_8;
use tracing::trace;

use crate::utils::{EditorError, Result};

/// 游戏使用的默认脚本密钥
pub const DEFAULT_SCRIPT_KEY: [u8; 32] = *b"UKu52ePUBwetZ9wNX88o54dnfKRu0T1l";

const BLOCK_SIZE: usize = 16;

/// 脚本加解密器
#[derive(Clone)]
pub struct ScriptCipher {
    key: [u8; 32],
}

impl std::fmt::Debug for ScriptCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptCipher").finish_non_exhaustive()
    }
}

impl Default for ScriptCipher {
    fn default() -> Self {
        Self::new(DEFAULT_SCRIPT_KEY)
    }
}

impl ScriptCipher {
    pub fn new(key: [u8; 32]) -> Self {
        Self { key }
    }

    /// 从 64 位十六进制字符串创建
    pub fn from_hex(hex: &str) -> Result<Self> {
        let hex = hex.trim();
        if hex.len() != 64 || !hex.is_ascii() {
            return Err(EditorError::parse("脚本密钥必须是 64 位十六进制字符"));
        }
        let mut key = [0u8; 32];
        for (i, byte) in key.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16)
                .map_err(|_| EditorError::parse("脚本密钥包含非十六进制字符"))?;
        }
        Ok(Self::new(key))
    }

    /// 解密脚本，返回标记文本
    pub fn decrypt(&self, script: &[u8]) -> Result<String> {
        let encoded = script.trim_ascii();
        let mut data = STANDARD
            .decode(encoded)
            .map_err(|e| EditorError::parse(format!("脚本不是有效的 base64: {}", e)))?;

        if data.is_empty() || data.len() % BLOCK_SIZE != 0 {
            return Err(EditorError::parse(format!(
                "脚本长度 {} 不是块大小的整数倍",
                data.len()
            )));
        }

        trace!("解密 {} 字节脚本", data.len());
        let cipher = Aes256::new(GenericArray::from_slice(&self.key));
        for chunk in data.chunks_exact_mut(BLOCK_SIZE) {
            cipher.decrypt_block(Block::from_mut_slice(chunk));
        }

        let plain_len = unpad(&data)?;
        decode_markup(&data[..plain_len])
    }

    /// 加密标记文本，返回 base64 脚本字节
    pub fn encrypt(&self, markup: &str) -> Vec<u8> {
        let bytes = markup.as_bytes();
        let pad = BLOCK_SIZE - bytes.len() % BLOCK_SIZE;

        let mut data = Vec::with_capacity(bytes.len() + pad);
        data.extend_from_slice(bytes);
        data.resize(bytes.len() + pad, pad as u8);

        let cipher = Aes256::new(GenericArray::from_slice(&self.key));
        for chunk in data.chunks_exact_mut(BLOCK_SIZE) {
            cipher.encrypt_block(Block::from_mut_slice(chunk));
        }

        STANDARD.encode(&data).into_bytes()
    }
}

/// 校验 PKCS#7 填充，返回明文长度
fn unpad(data: &[u8]) -> Result<usize> {
    let pad = *data.last().unwrap_or(&0) as usize;
    if pad == 0 || pad > BLOCK_SIZE || pad > data.len() {
        return Err(EditorError::parse("脚本填充无效（密钥错误或数据损坏）"));
    }
    if !data[data.len() - pad..].iter().all(|&b| b as usize == pad) {
        return Err(EditorError::parse("脚本填充无效（密钥错误或数据损坏）"));
    }
    Ok(data.len() - pad)
}

/// 以 UTF-8 解码标记文本
///
/// 带 UTF-8 BOM 时去除 BOM；其他 BOM（如 UTF-16）视为不支持的编码。
fn decode_markup(bytes: &[u8]) -> Result<String> {
    let body = match encoding_rs::Encoding::for_bom(bytes) {
        Some((encoding, bom_len)) if encoding == UTF_8 => &bytes[bom_len..],
        Some((encoding, _)) => {
            return Err(EditorError::parse(format!(
                "不支持的脚本编码: {}",
                encoding.name()
            )))
        }
        None => bytes,
    };

    UTF_8
        .decode_without_bom_handling_and_without_replacement(body)
        .map(|text| text.into_owned())
        .ok_or_else(|| EditorError::parse("脚本不是有效的 UTF-8"))
}
