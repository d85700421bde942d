// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use encoding_rs::{Encoding, GB18030, GBK};
use once_cell::sync::Lazy;
use thiserror::Error;
use tracing::debug;

/// UTF-8 字节序标记
pub const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// 文本编码处理错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TextEncodingError {
    #[error("编码转换失败: {0}")]
    ConversionFailed(String),
}

/// 文本编码处理器
///
/// 带 BOM 的内容视为 UTF-8；其余内容先按主编码解码，失败后按备用编码解码。
pub struct TextEncodingProcessor {
    primary: &'static Encoding,
    fallback: &'static Encoding,
}

/// 全局文本编码处理器实例
static TEXT_PROCESSOR: Lazy<TextEncodingProcessor> = Lazy::new(TextEncodingProcessor::new);

impl Default for TextEncodingProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextEncodingProcessor {
    /// 创建新的文本编码处理器（GBK 为主，GB18030 兜底）
    pub fn new() -> Self {
        Self::with_encodings(GBK, GB18030)
    }

    pub fn with_encodings(primary: &'static Encoding, fallback: &'static Encoding) -> Self {
        Self { primary, fallback }
    }

    /// 获取全局处理器实例
    pub fn global() -> &'static Self {
        &TEXT_PROCESSOR
    }

    /// 将响应内容规范化为 UTF-8 字节
    pub fn normalize(&self, input: &[u8]) -> Result<Vec<u8>, TextEncodingError> {
        if let Some(rest) = input.strip_prefix(&UTF8_BOM) {
            debug!("检测到 UTF-8 BOM，去除后原样返回");
            return Ok(rest.to_vec());
        }

        if let Some(text) = Self::decode_strict(self.primary, input) {
            return Ok(text.into_bytes());
        }

        debug!(
            "{} 解码失败，尝试 {}",
            self.primary.name(),
            self.fallback.name()
        );
        Self::decode_strict(self.fallback, input)
            .map(String::into_bytes)
            .ok_or_else(|| {
                TextEncodingError::ConversionFailed(format!(
                    "{} 与 {} 均无法解码 {} 字节的内容",
                    self.primary.name(),
                    self.fallback.name(),
                    input.len()
                ))
            })
    }

    fn decode_strict(encoding: &'static Encoding, input: &[u8]) -> Option<String> {
        encoding
            .decode_without_bom_handling_and_without_replacement(input)
            .map(|cow| cow.into_owned())
    }
}

/// 便捷函数：规范化单个响应内容的编码
pub fn normalize_encoding(input: &[u8]) -> Result<Vec<u8>, TextEncodingError> {
    TextEncodingProcessor::global().normalize(input)
}

/// 规范化编码并转为字符串；解码失败时保留原始字节（按有损 UTF-8 解释）
pub fn decode_body(input: &[u8]) -> String {
    match normalize_encoding(input) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => {
            debug!("保留原始响应内容: {}", e);
            String::from_utf8_lossy(input).into_owned()
        }
    }
}
