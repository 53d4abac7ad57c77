//! # 动图处理模块（gif_handler）
//!
//! ## 设计思路
//!
//! 将“请求校验 → 下载校验 → 写入剪贴板 → 清理临时文件”按职责拆分为多个子模块：
//!
//! - `handler`：编排整条处理流水线
//! - `loader`：URL 改写、下载、GIF 签名校验
//! - `artifact`：临时文件守卫
//! - `clipboard_writer`：按平台调用外部工具写入剪贴板
//! - `config/error`：配置与错误模型
//!
//! ## 实现思路
//!
//! 下载与写剪贴板都定义为 trait（`GifFetcher` / `ClipboardWriter`），
//! `RequestDispatcher` 对二者泛型化，入口只在启动时选定一次具体实现。
//!
//! ```text
//! Request
//!    ↓
//! handler.rs（校验 + 阶段耗时日志）
//!    ├─ loader.rs（.webp→.gif 改写 + 下载 + 签名校验）
//!    │     └─ artifact.rs（临时文件，Drop 时清理）
//!    └─ clipboard_writer.rs（osascript / powershell / xclip|wl-copy）
//!    ↓
//! Response
//! ```

mod artifact;
mod clipboard_writer;
mod config;
mod error;
mod handler;
mod loader;

pub use artifact::TempArtifact;
pub use clipboard_writer::{
    AppleScriptClipboard, ClipboardUtility, ClipboardWriter, FileInput, LinuxClipboard,
    PlatformClipboard, PowerShellClipboard,
};
pub use config::{DEFAULT_USER_AGENT, FetchConfig};
pub use error::{ClipboardError, FetchError};
pub use handler::{RequestDispatcher, validate};
pub use loader::{GifFetcher, HttpGifFetcher, gif_candidate_url, is_gif_signature};
pub(crate) use loader::redact_url_for_log;
