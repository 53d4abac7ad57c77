//! # 错误模型模块
//!
//! ## 设计思路
//!
//! 下载与剪贴板各用一个错误枚举，避免字符串拼接式错误处理。
//! 通过 `thiserror` 保持人类可读错误（直接作为响应的 `error` 字段），
//! 同时让调用侧与测试可以按分支匹配。

use std::io;

/// 下载阶段错误。
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Download timed out after {0} seconds")]
    Timeout(u64),

    #[error("HTTP error: {0}")]
    Http(u16),

    #[error("Downloaded file exceeds the {limit} byte size limit")]
    TooLarge { limit: u64 },

    /// 下载成功但文件头不是 `GIF87a` / `GIF89a`。
    #[error("Downloaded file is not a valid GIF (invalid format)")]
    InvalidFormat,

    #[error("Temporary file error: {0}")]
    TempFile(#[from] io::Error),
}

/// 剪贴板写入错误。
#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    #[error("Unsupported operating system: {0}")]
    UnsupportedOs(String),

    #[error("No supported clipboard utility found; install xclip or wl-clipboard")]
    NoSupportedUtility,

    /// 外部工具以非零状态退出，`diagnostic` 为其错误输出。
    #[error("{tool} failed: {diagnostic}")]
    ToolFailed { tool: String, diagnostic: String },

    #[error("Failed to launch {tool}: {source}")]
    Launch {
        tool: String,
        #[source]
        source: io::Error,
    },

    #[error("Clipboard I/O error: {0}")]
    Io(#[from] io::Error),
}
