//! # 日志初始化
//!
//! stdout 承载原生消息协议，任何日志都不能写到 stdout。
//! 默认写入 `~/.copy-gif-extension/copy-gif-host.log`（追加），
//! 文件无法打开时退回 stderr，浏览器会把它转到自己的控制台。
//!
//! 只在入口调用一次；库代码只使用 `log` 宏，不负责初始化。

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};

use env_logger::{Builder, Env, Target};

use crate::config::{LOG_FILTER_ENV, LogConfig};

/// 日志会话。进程退出前调用 [`LogSession::finish`]。
#[derive(Debug)]
pub struct LogSession {
    _private: (),
}

impl LogSession {
    pub fn finish(self) {
        log::info!("👋 宿主进程退出");
        log::logger().flush();
    }
}

/// 初始化全局 logger。重复初始化会被忽略。
pub fn init(config: &LogConfig) -> LogSession {
    let mut builder = Builder::from_env(Env::new().filter_or(LOG_FILTER_ENV, &config.default_filter));

    builder.format(|buf, record| {
        writeln!(
            buf,
            "{} - {} - {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S,%3f"),
            record.level(),
            record.args()
        )
    });

    let open_error = match open_log_file(config) {
        Ok(handle) => {
            builder.target(Target::Pipe(Box::new(handle)));
            None
        }
        Err(e) => {
            builder.target(Target::Stderr);
            Some(e)
        }
    };

    if let Err(e) = builder.try_init() {
        eprintln!("logger already initialised: {}", e);
    }

    if let Some(e) = open_error {
        log::warn!(
            "⚠️ 无法打开日志文件 {}，改为输出到 stderr: {}",
            config.file_path().display(),
            e
        );
    }

    LogSession { _private: () }
}

fn open_log_file(config: &LogConfig) -> io::Result<File> {
    fs::create_dir_all(&config.dir)?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(config.file_path())
}
