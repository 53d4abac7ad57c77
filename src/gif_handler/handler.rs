//! # 核心编排模块
//!
//! ## 设计思路
//!
//! `RequestDispatcher` 只负责流程编排，不关心下载和剪贴板的具体实现。
//! 处理链路固定为：
//! 1. 校验请求（动作名、URL）
//! 2. 下载到临时文件并校验 GIF 签名
//! 3. 写入剪贴板
//! 4. 清理临时文件
//!
//! ## 实现思路
//!
//! - 对下载器与剪贴板写入器做泛型参数化，测试中可直接替换为假实现。
//! - `process` 返回分类错误供测试断言；`handle` 永不失败，只负责映射为响应。
//! - 临时文件由 `TempArtifact` 守卫持有，任何提前返回都会触发清理。
//! - 记录 `fetch/copy/total` 阶段耗时，便于排查慢请求。

use std::time::Instant;

use super::{ClipboardWriter, GifFetcher};
use crate::error::{HostError, ValidationError};
use crate::protocol::{Request, Response};

/// 单条请求的处理器。
pub struct RequestDispatcher<F, W> {
    fetcher: F,
    writer: W,
}

impl<F, W> RequestDispatcher<F, W>
where
    F: GifFetcher,
    W: ClipboardWriter,
{
    pub fn new(fetcher: F, writer: W) -> Self {
        Self { fetcher, writer }
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// 处理请求并生成响应。所有错误都会被转换为失败响应。
    pub async fn handle(&self, request: &Request) -> Response {
        match self.process(request).await {
            Ok(()) => {
                log::info!("🎉 GIF 已复制到剪贴板");
                Response::success()
            }
            Err(e) => {
                log::error!("❌ 请求处理失败: {}", e);
                Response::failure(e.to_string())
            }
        }
    }

    pub async fn process(&self, request: &Request) -> Result<(), HostError> {
        let url = validate(request)?;
        log::info!("🔗 开始处理 copyGif 请求");

        let total_start = Instant::now();

        let fetch_start = Instant::now();
        let artifact = self.fetcher.fetch(url).await?;
        let fetch_elapsed = fetch_start.elapsed();

        let copy_start = Instant::now();
        let written = self.writer.write(artifact.path()).await;
        let copy_elapsed = copy_start.elapsed();

        artifact.cleanup();

        log::info!(
            "[perf] fetch={}ms copy={}ms total={}ms",
            fetch_elapsed.as_millis(),
            copy_elapsed.as_millis(),
            total_start.elapsed().as_millis()
        );

        written.map_err(HostError::from)
    }
}

/// 校验请求并返回待下载的 URL。
pub fn validate(request: &Request) -> Result<&str, ValidationError> {
    if !request.is_copy_gif() {
        return Err(ValidationError::UnknownAction(request.action.clone()));
    }

    request.url().ok_or(ValidationError::MissingUrl)
}
