//! # 宿主配置
//!
//! 宿主由浏览器直接拉起，没有命令行参数，也没有配置文件。
//! 可调项全部有生产默认值，仅允许通过少量环境变量覆盖：
//!
//! | 变量 | 作用 |
//! |------|------|
//! | `COPY_GIF_HOST_LOG_DIR` | 日志目录 |
//! | `COPY_GIF_HOST_LOG` | 日志过滤（`env_logger` 语法） |
//! | `COPY_GIF_HOST_TIMEOUT_SECS` | 下载总超时（秒） |

use std::path::PathBuf;

use crate::gif_handler::FetchConfig;

pub const LOG_DIR_ENV: &str = "COPY_GIF_HOST_LOG_DIR";
pub const LOG_FILTER_ENV: &str = "COPY_GIF_HOST_LOG";
pub const TIMEOUT_ENV: &str = "COPY_GIF_HOST_TIMEOUT_SECS";

const DEFAULT_LOG_DIR_NAME: &str = ".copy-gif-extension";
const DEFAULT_LOG_FILE_NAME: &str = "copy-gif-host.log";
const DEFAULT_LOG_FILTER: &str = "info";

/// 日志配置。
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub dir: PathBuf,
    pub file_name: String,
    /// 未设置 `COPY_GIF_HOST_LOG` 时使用的过滤级别。
    pub default_filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        let base = dirs::home_dir().unwrap_or_else(std::env::temp_dir);
        Self {
            dir: base.join(DEFAULT_LOG_DIR_NAME),
            file_name: DEFAULT_LOG_FILE_NAME.to_string(),
            default_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl LogConfig {
    pub fn file_path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }
}

/// 宿主整体配置。
#[derive(Debug, Clone, Default)]
pub struct HostConfig {
    pub log: LogConfig,
    pub fetch: FetchConfig,
}

impl HostConfig {
    /// 默认配置叠加环境变量覆盖。
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(dir) = lookup(LOG_DIR_ENV).filter(|v| !v.trim().is_empty()) {
            config.log.dir = PathBuf::from(dir);
        }

        // 无法解析时静默保留默认值：此时日志尚未初始化
        if let Some(secs) = lookup(TIMEOUT_ENV)
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
        {
            config.fetch.download_timeout = secs;
        }

        config
    }
}
