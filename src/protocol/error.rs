//! # 协议错误
//!
//! 帧层面的失败都意味着与浏览器之间的通道已经不可信，
//! 因此这里的错误只会被记录日志，不会再尝试回写响应。

use std::io;

/// 帧读写错误。
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// 长度前缀或消息体在流结束前未读满。
    #[error("truncated frame: expected {expected} bytes, received {received}")]
    Truncated { expected: usize, received: usize },

    /// 消息长度超过协议上限。
    #[error("message of {size} bytes exceeds the {limit} byte limit")]
    MessageTooLarge { size: usize, limit: usize },

    #[error("stdio error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),
}
