//! # 单次会话
//!
//! 浏览器为每条消息启动一个新进程：读一帧、处理、回写一帧、退出。
//! 这里把这一流程从 stdio 中抽离出来，读写端均可替换，便于测试。

use std::io::{Read, Write};
use std::process::ExitCode;

use crate::error::HostError;
use crate::gif_handler::{ClipboardWriter, GifFetcher, RequestDispatcher, redact_url_for_log};
use crate::protocol::{self, Response};

/// 一次会话的结局。
#[derive(Debug, PartialEq, Eq)]
pub enum SessionOutcome {
    /// 已回写响应（成功或失败）。
    Responded(Response),
    /// 对端未发送任何数据就关闭了输入。
    EndOfInput,
    /// 帧损坏或响应无法写出，通道已不可用。
    Fatal,
}

impl SessionOutcome {
    /// 进程退出码：正常结束为 0，通道损坏为 1。
    pub fn exit_status(&self) -> u8 {
        match self {
            Self::Responded(_) | Self::EndOfInput => 0,
            Self::Fatal => 1,
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.exit_status())
    }
}

/// 读取一条请求，处理后回写响应。
pub async fn serve_one<R, W, F, C>(
    reader: &mut R,
    writer: &mut W,
    dispatcher: &RequestDispatcher<F, C>,
) -> SessionOutcome
where
    R: Read,
    W: Write,
    F: GifFetcher,
    C: ClipboardWriter,
{
    let response = match protocol::read_message(reader) {
        Ok(Some(request)) => {
            log::info!(
                "📨 收到请求: action={:?}, url={:?}",
                request.action,
                request.url().map(redact_url_for_log).unwrap_or_default()
            );
            dispatcher.handle(&request).await
        }
        Ok(None) => {
            log::info!("📭 输入已关闭，未收到消息");
            return SessionOutcome::EndOfInput;
        }
        Err(e) if e.is_fatal() => {
            log::error!("❌ {}", e);
            return SessionOutcome::Fatal;
        }
        Err(e) => {
            log::error!("❌ 请求无法解析: {}", e);
            Response::failure(e.to_string())
        }
    };

    match protocol::send_message(writer, &response) {
        Ok(()) => SessionOutcome::Responded(response),
        Err(e) => {
            log::error!("❌ 响应写出失败: {}", HostError::from(e));
            SessionOutcome::Fatal
        }
    }
}
