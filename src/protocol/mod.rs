//! # 原生消息通道（protocol）
//!
//! 负责浏览器与宿主之间唯一的线路契约：
//!
//! ```text
//! ┌──────────────┬───────────────────────────────┐
//! │ u32 LE 长度  │ UTF-8 JSON（Request/Response）│
//! └──────────────┴───────────────────────────────┘
//! ```
//!
//! - `framing`：长度前缀帧的读写
//! - `message`：请求 / 响应数据模型
//! - `error`：帧层面的致命错误
//!
//! 帧完整但 JSON 不合法时通道本身仍然可用，
//! 因此归类为 `ValidationError`，由入口回写失败响应。

mod error;
pub mod framing;
mod message;

use std::io::{Read, Write};

pub use error::ProtocolError;
pub use framing::{read_frame, write_frame};
pub use message::{COPY_GIF_ACTION, NATIVE_METHOD, Request, Response};

use crate::error::{HostError, ValidationError};

/// 读取并解析一条请求。
///
/// 返回 `Ok(None)` 表示对端在发送任何数据前就关闭了输入。
pub fn read_message<R: Read>(reader: &mut R) -> Result<Option<Request>, HostError> {
    let Some(payload) = read_frame(reader)? else {
        return Ok(None);
    };

    log::debug!("📨 收到原始消息: {} bytes", payload.len());

    let request = serde_json::from_slice::<Request>(&payload)
        .map_err(|e| ValidationError::MalformedRequest(e.to_string()))?;

    Ok(Some(request))
}

/// 序列化并发送一条响应。
pub fn send_message<W: Write>(writer: &mut W, response: &Response) -> Result<(), ProtocolError> {
    let payload = serde_json::to_vec(response)?;
    write_frame(writer, &payload)?;
    log::debug!("📤 已发送响应: {} bytes", payload.len());
    Ok(())
}
