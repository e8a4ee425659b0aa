//! 行解码器
//!
//! 响应体按字节缓冲，只在 `\n` 字节处切分。`\n` 不会出现在 UTF-8 多字节
//! 序列内部，所以被网络分片切开的多字节字符会在整行到齐后再解码。

use crate::models::StreamRecord;
use tracing::debug;

/// 数据记录的前缀
pub const DATA_PREFIX: &str = "data:";

/// 增量行解码器
#[derive(Debug, Default)]
pub struct LineDecoder {
    buffer: Vec<u8>,
}

impl LineDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一个分片，返回其中已经完整的记录
    pub fn push(&mut self, chunk: &[u8]) -> Vec<StreamRecord> {
        self.buffer.extend_from_slice(chunk);

        let Some(last_newline) = self.buffer.iter().rposition(|&b| b == b'\n') else {
            return Vec::new();
        };

        // 最后一个换行之后的部分留在缓冲区
        let rest = self.buffer.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.buffer, rest);

        complete
            .split(|&b| b == b'\n')
            .filter_map(|line| parse_line(&String::from_utf8_lossy(line)))
            .collect()
    }

    /// 流结束时处理缓冲区中没有换行结尾的最后一段
    pub fn finish(self) -> Option<StreamRecord> {
        if self.buffer.is_empty() {
            return None;
        }
        parse_line(&String::from_utf8_lossy(&self.buffer))
    }

    /// 尚未成行的字节数
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }
}

/// 解析一行
///
/// 只有以 `data:` 开头的行才是数据记录。空负载、非法 JSON、形态不明的
/// 对象都返回 None：单条坏记录不能中断整个流。
pub fn parse_line(line: &str) -> Option<StreamRecord> {
    let payload = line.strip_prefix(DATA_PREFIX)?.trim();
    if payload.is_empty() {
        return None;
    }
    match serde_json::from_str(payload) {
        Ok(value) => StreamRecord::from_value(value),
        Err(e) => {
            debug!("跳过无法解析的数据行 ({}): {}", e, crate::utils::truncate_text(payload, 80));
            None
        }
    }
}
