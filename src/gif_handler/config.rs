//! # 下载配置
//!
//! 将下载阶段的可调参数集中到 `FetchConfig`，`Default` 提供生产可用的值。
//! 测试中直接修改字段即可（例如把临时目录指向独立的 `tempdir`）。

use std::path::PathBuf;
use std::time::Duration;

/// 默认 User-Agent。不少图床会拒绝没有浏览器标识的请求。
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// 图片下载配置。
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// 允许下载的最大文件体积（字节）。
    pub max_file_size: u64,
    /// 单次请求总超时（秒）。
    pub download_timeout: u64,
    /// 建立连接（TCP/TLS）超时（秒）。
    pub connect_timeout: u64,
    /// 最大重定向次数。
    pub max_redirects: usize,
    pub user_agent: String,
    /// 是否使用系统代理（`HTTP_PROXY` 等环境变量）。
    pub use_system_proxy: bool,
    /// 临时文件目录；`None` 时使用系统临时目录。
    pub temp_dir: Option<PathBuf>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_file_size: 50 * 1024 * 1024,
            download_timeout: 30,
            connect_timeout: 8,
            max_redirects: 5,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            use_system_proxy: true,
            temp_dir: None,
        }
    }
}

impl FetchConfig {
    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout)
    }
}
