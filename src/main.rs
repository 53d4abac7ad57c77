//! # copy-gif-host — 进程入口
//!
//! 由浏览器按原生消息清单拉起，处理一条消息后退出。
//! 本文件只负责初始化日志、组装依赖，业务逻辑见 `lib.rs` 架构文档。

use std::io;
use std::process::ExitCode;

use copy_gif_host::config::HostConfig;
use copy_gif_host::gif_handler::{HttpGifFetcher, PlatformClipboard, RequestDispatcher};
use copy_gif_host::{host, logging};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let config = HostConfig::from_env();
    let session = logging::init(&config.log);

    log::info!("🚀 copy-gif-host {} 启动", env!("CARGO_PKG_VERSION"));
    log::info!(
        "💻 平台: {} ({})",
        std::env::consts::OS,
        std::env::consts::ARCH
    );

    let dispatcher = RequestDispatcher::new(
        HttpGifFetcher::new(config.fetch),
        PlatformClipboard::detect(),
    );

    let outcome = {
        let mut stdin = io::stdin().lock();
        let mut stdout = io::stdout().lock();
        host::serve_one(&mut stdin, &mut stdout, &dispatcher).await
    };

    session.finish();
    outcome.exit_code()
}
