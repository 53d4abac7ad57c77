//! # 帧编解码
//!
//! ## 设计思路
//!
//! 浏览器原生消息协议：每条消息 = 4 字节小端无符号长度前缀 + UTF-8 JSON。
//! 读写函数对 `Read` / `Write` 泛型化，生产环境接 stdin/stdout，
//! 测试中直接使用内存缓冲区。
//!
//! ## 实现思路
//!
//! - 长度前缀一个字节都没读到：对端已关闭，返回 `None`，调用方静默退出。
//! - 前缀或消息体读到一半就遇到 EOF：视为致命的截断错误。
//! - 先校验长度上限再分配缓冲区，避免恶意长度导致巨量内存申请。
//! - 写出后立即 `flush`，防止浏览器在管道缓冲上空等。

use std::io::{self, Read, Write};

use super::ProtocolError;

/// 长度前缀字节数。
pub const LENGTH_PREFIX_BYTES: usize = 4;

/// 允许读取的单条消息上限（64 MiB）。
pub const MAX_INCOMING_MESSAGE_BYTES: usize = 64 * 1024 * 1024;

/// 浏览器对宿主发出消息的限制（1 MiB）。
pub const MAX_OUTGOING_MESSAGE_BYTES: usize = 1024 * 1024;

/// 读取一帧原始负载。
///
/// 返回值：
/// - `Ok(Some(payload))`：完整读到一帧
/// - `Ok(None)`：流在任何数据到达前已关闭
/// - `Err(...)`：截断、超长或底层 I/O 错误
pub fn read_frame<R: Read>(reader: &mut R) -> Result<Option<Vec<u8>>, ProtocolError> {
    let mut prefix = [0u8; LENGTH_PREFIX_BYTES];
    match read_until_full(reader, &mut prefix)? {
        0 => return Ok(None),
        LENGTH_PREFIX_BYTES => {}
        received => {
            return Err(ProtocolError::Truncated {
                expected: LENGTH_PREFIX_BYTES,
                received,
            });
        }
    }

    let length = u32::from_le_bytes(prefix) as usize;
    log::debug!("📏 消息长度: {}", length);

    if length > MAX_INCOMING_MESSAGE_BYTES {
        return Err(ProtocolError::MessageTooLarge {
            size: length,
            limit: MAX_INCOMING_MESSAGE_BYTES,
        });
    }

    let mut payload = vec![0u8; length];
    let received = read_until_full(reader, &mut payload)?;
    if received != length {
        return Err(ProtocolError::Truncated {
            expected: length,
            received,
        });
    }

    Ok(Some(payload))
}

/// 写出一帧并立即刷新。
pub fn write_frame<W: Write>(writer: &mut W, payload: &[u8]) -> Result<(), ProtocolError> {
    if payload.len() > MAX_OUTGOING_MESSAGE_BYTES {
        return Err(ProtocolError::MessageTooLarge {
            size: payload.len(),
            limit: MAX_OUTGOING_MESSAGE_BYTES,
        });
    }

    let length = u32::try_from(payload.len()).map_err(|_| ProtocolError::MessageTooLarge {
        size: payload.len(),
        limit: MAX_OUTGOING_MESSAGE_BYTES,
    })?;

    writer.write_all(&length.to_le_bytes())?;
    writer.write_all(payload)?;
    writer.flush()?;
    Ok(())
}

/// 尽量读满 `buf`，返回实际读到的字节数（遇到 EOF 提前返回）。
fn read_until_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize, ProtocolError> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(ProtocolError::Io(e)),
        }
    }
    Ok(filled)
}
