//! # copy-gif-host — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │              浏览器扩展 (background.js)                   │
//! │   右键菜单 → sendNativeMessage({action, url})            │
//! └───────┬──────────────────────────────────────────────────┘
//!         ↕ stdio：u32 LE 长度前缀 + JSON
//! ┌───────┼──────────────────────────────────────────────────┐
//! │       ↕            宿主进程 (Rust)                        │
//! │                                                          │
//! │  ┌─ protocol ─── 帧读写 + Request/Response               │
//! │  │                                                       │
//! │  ├─ host ─────── 单次会话：读一帧 → 处理 → 回写一帧       │
//! │  │                                                       │
//! │  ├─ gif_handler  下载·校验·写剪贴板                       │
//! │  │   ├─ loader           .webp→.gif 改写 + 流式下载       │
//! │  │   ├─ artifact         临时文件 RAII 守卫               │
//! │  │   └─ clipboard_writer osascript / powershell / xclip   │
//! │  │                                                       │
//! │  ├─ error ────── HostError (统一错误类型)                 │
//! │  ├─ config ───── 默认值 + 环境变量覆盖                    │
//! │  └─ logging ──── env_logger 写入日志文件                  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`protocol`] | 原生消息帧格式、请求/响应模型 |
//! | [`host`] | 串起一次完整会话并给出退出码 |
//! | [`gif_handler`] | 请求校验、GIF 下载与校验、平台剪贴板写入 |
//! | [`error`] | 统一错误类型 `HostError`，其文本即响应中的 `error` 字段 |
//! | [`config`] | `HostConfig`：日志与下载参数 |
//! | [`logging`] | 日志初始化与退出前刷新 |

pub mod config;
pub mod error;
pub mod gif_handler;
pub mod host;
pub mod logging;
pub mod protocol;
