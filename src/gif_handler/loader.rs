//! # 下载与校验模块
//!
//! ## 设计思路
//!
//! 把“URL → 本地临时 GIF 文件”收敛到一个 `GifFetcher` 能力上，
//! 编排层只关心拿到的 `TempArtifact`，测试中可以替换为假实现。
//!
//! 很多图片站点对动图只暴露静态的 `.webp` 预览地址，同目录下的 `.gif` 才是动图。
//! 因此对以 `.webp` 结尾的地址先猜测 `.gif` 兄弟地址，失败再回退原地址。
//! 这只是地址层面的猜测，并不做任何格式转换。
//!
//! ## 实现思路
//!
//! - 候选地址：仅替换结尾的 `.webp`，其余位置保持不变。
//! - 流式写入临时文件，同时按 `Content-Length` 与累计字节数双重限制体积。
//! - 下载成功后只校验文件头 `GIF87a` / `GIF89a`，
//!   防止把 200 状态返回的 HTML 错误页之类的内容放进剪贴板。
//! - 任何失败路径上，`TempArtifact` 随作用域结束自动清理。

use std::error::Error as StdError;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use tokio::io::AsyncWriteExt;

use super::{FetchConfig, FetchError, TempArtifact};

const WEBP_SUFFIX: &str = ".webp";
const GIF_SUFFIX: &str = ".gif";
const GIF87A: &[u8] = b"GIF87a";
const GIF89A: &[u8] = b"GIF89a";
/// 文件头探测长度；判定只看前 6 字节，多读一些用于日志中的类型识别。
const SIGNATURE_PROBE_BYTES: u64 = 64;
/// 只声明偏好 GIF：按 `Accept` 协商的 CDN 否则可能给 `.gif` 地址返回 WebP。
const ACCEPT_IMAGES: &str = "image/gif,image/*;q=0.8,*/*;q=0.5";

/// 将 URL 下载为本地临时 GIF 文件的能力。
#[allow(async_fn_in_trait)]
pub trait GifFetcher {
    async fn fetch(&self, url: &str) -> Result<TempArtifact, FetchError>;
}

/// 基于 reqwest 的 HTTP 下载实现。
#[derive(Debug, Clone, Default)]
pub struct HttpGifFetcher {
    config: FetchConfig,
}

impl HttpGifFetcher {
    pub fn new(config: FetchConfig) -> Self {
        Self { config }
    }

    /// 下载单个地址到 `dest`，覆盖已有内容，返回写入字节数。
    async fn download_into(
        &self,
        client: &reqwest::Client,
        url: &str,
        dest: &Path,
    ) -> Result<u64, FetchError> {
        let parsed = parse_http_url(url)?;

        log::debug!("📡 发送 HTTP 请求...");
        let mut response = client
            .get(parsed)
            .header(reqwest::header::ACCEPT, ACCEPT_IMAGES)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http(status.as_u16()));
        }

        let limit = self.config.max_file_size;
        if let Some(len) = response.content_length() {
            if len > limit {
                return Err(FetchError::TooLarge { limit });
            }
        }

        let mut file = tokio::fs::File::create(dest).await?;
        let mut total: u64 = 0;

        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| self.map_reqwest_error(e))?
        {
            total = total.saturating_add(chunk.len() as u64);
            if total > limit {
                return Err(FetchError::TooLarge { limit });
            }
            file.write_all(&chunk).await?;
        }

        file.flush().await?;
        log::info!("📥 下载完成 - {} bytes", total);

        Ok(total)
    }

    fn build_client(&self) -> Result<reqwest::Client, FetchError> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.config.download_timeout())
            .connect_timeout(self.config.connect_timeout())
            .redirect(reqwest::redirect::Policy::limited(self.config.max_redirects))
            .user_agent(self.config.user_agent.as_str());

        if !self.config.use_system_proxy {
            builder = builder.no_proxy();
        }

        builder
            .build()
            .map_err(|e| FetchError::Network(format!("cannot create HTTP client: {}", e)))
    }

    /// 实际触发的超时上限（秒）：连接阶段用连接超时，其余用总超时。
    fn timeout_limit(&self, during_connect: bool) -> u64 {
        if during_connect {
            self.config.connect_timeout
        } else {
            self.config.download_timeout
        }
    }

    /// 统一映射 reqwest 错误到业务错误。
    fn map_reqwest_error(&self, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout(self.timeout_limit(e.is_connect()))
        } else {
            FetchError::Network(describe_error_chain(&e.without_url()))
        }
    }
}

impl GifFetcher for HttpGifFetcher {
    async fn fetch(&self, url: &str) -> Result<TempArtifact, FetchError> {
        let rewritten = gif_candidate_url(url);
        if let Some(candidate) = &rewritten {
            log::info!("🔁 WebP 地址已改写为 GIF: {}", redact_url_for_log(candidate));
        }
        let primary = rewritten.as_deref().unwrap_or(url);

        let artifact = TempArtifact::create(self.config.temp_dir.as_deref())?;
        let client = self.build_client()?;

        log::info!("🌐 开始下载 GIF - URL: {}", redact_url_for_log(primary));
        if let Err(err) = self.download_into(&client, primary, artifact.path()).await {
            if rewritten.is_none() {
                return Err(err);
            }

            log::warn!(
                "⚠️ GIF 地址下载失败（{}），回退原始地址: {}",
                err,
                redact_url_for_log(url)
            );
            self.download_into(&client, url, artifact.path()).await?;
        }

        validate_gif_signature(artifact.path())?;
        log::info!("💾 已保存到临时文件: {}", artifact.path().display());

        Ok(artifact)
    }
}

/// 以 `.webp` 结尾的地址返回对应的 `.gif` 候选地址，其余返回 `None`。
pub fn gif_candidate_url(url: &str) -> Option<String> {
    url.strip_suffix(WEBP_SUFFIX)
        .map(|stem| format!("{}{}", stem, GIF_SUFFIX))
}

pub fn is_gif_signature(bytes: &[u8]) -> bool {
    bytes.starts_with(GIF87A) || bytes.starts_with(GIF89A)
}

/// 校验落盘文件的 GIF 文件头。
fn validate_gif_signature(path: &Path) -> Result<(), FetchError> {
    let mut head = Vec::new();
    File::open(path)?
        .take(SIGNATURE_PROBE_BYTES)
        .read_to_end(&mut head)?;

    if is_gif_signature(&head) {
        return Ok(());
    }

    let detected = infer::get(&head)
        .map(|kind| kind.mime_type())
        .unwrap_or("unknown");
    log::error!(
        "❌ 下载内容不是 GIF（{} 字节文件头，识别类型：{}）",
        head.len(),
        detected
    );

    Err(FetchError::InvalidFormat)
}

fn parse_http_url(url: &str) -> Result<reqwest::Url, FetchError> {
    let parsed = reqwest::Url::parse(url).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(FetchError::InvalidUrl(format!(
            "unsupported scheme '{}', only http and https are allowed",
            other
        ))),
    }
}

/// 去掉查询串与片段，避免把签名 token 之类写进日志。
pub(crate) fn redact_url_for_log(url: &str) -> String {
    let Ok(parsed) = reqwest::Url::parse(url) else {
        return "<invalid-url>".to_string();
    };

    let host = parsed.host_str().unwrap_or("<unknown-host>");
    let port = parsed.port().map(|p| format!(":{}", p)).unwrap_or_default();

    format!("{}://{}{}{}", parsed.scheme(), host, port, parsed.path())
}

/// 拼接错误及其全部 `source`，reqwest 的顶层消息通常过于笼统。
fn describe_error_chain(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.contains(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }
    message
}
