//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 定义全局统一的 `HostError` 枚举，承载一次请求处理中可能出现的全部错误类别：
//! 协议、校验、下载、剪贴板。各子模块保留自己的细分错误类型，
//! 通过 `#[from]` 汇总到这里，调用方仍可按分支匹配。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - `Display` 文本即返回给扩展的 `error` 字段，因此措辞面向最终用户（英文）。
//! - 只有 `Protocol` 会让进程直接退出，其余分支都会被转换为失败响应。

use crate::gif_handler::{ClipboardError, FetchError};
use crate::protocol::ProtocolError;

/// 宿主进程统一错误类型
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// 帧读写失败，通道已不可用
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// 请求字段缺失或不合法
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// 下载 / 格式校验失败
    #[error("{0}")]
    Fetch(#[from] FetchError),

    /// 剪贴板写入失败
    #[error("{0}")]
    Clipboard(#[from] ClipboardError),
}

impl HostError {
    /// 是否为致命错误（通道已损坏，无法再回写响应）。
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Protocol(_))
    }
}

/// 请求校验错误
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("No URL provided")]
    MissingUrl,

    /// 帧完整但内容不是合法的请求 JSON
    #[error("Invalid request: {0}")]
    MalformedRequest(String),
}
