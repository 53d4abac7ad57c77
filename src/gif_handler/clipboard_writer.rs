//! # 剪贴板写入模块
//!
//! ## 设计思路
//!
//! 通用的“把图片写入剪贴板”接口（例如 arboard 的 `set_image`）只接受 RGBA 像素，
//! 动图会被压成单帧。要保留动画，只能把 GIF 文件原样交给各平台自己的工具：
//!
//! | 平台 | 工具 | 写入形式 |
//! |------|------|----------|
//! | macOS | `osascript` | `«class GIFf»` 数据 |
//! | Windows | `powershell` | 单文件 FileDropList |
//! | Linux | `xclip`，缺失时 `wl-copy` | `image/gif` MIME |
//!
//! 因此本模块不使用任何进程内剪贴板 API，全部通过子进程完成。
//!
//! ## 实现思路
//!
//! - `ClipboardWriter` 是统一能力；每个平台一个具体实现。
//! - `PlatformClipboard` 在启动时按 `std::env::consts::OS` 选定一次，调用侧不再出现平台分支。
//! - 外部工具非零退出时，把其 stderr 作为错误信息带回给扩展。
//! - Linux 的两个工具都会 fork 出后台进程持有选区，且继承子进程的 stdio。
//!   若用管道收集 stderr，宿主会一直等到选区被替换，因此 stderr 写入匿名临时文件。

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;
use std::process::{ExitStatus, Stdio};

use tokio::process::Command;

use super::ClipboardError;

const GIF_MIME: &str = "image/gif";

/// 把一个动图文件写入系统剪贴板的能力。
#[allow(async_fn_in_trait)]
pub trait ClipboardWriter {
    async fn write(&self, path: &Path) -> Result<(), ClipboardError>;
}

// ============================================================================
// 平台选择
// ============================================================================

/// 按当前操作系统选定的剪贴板实现。
#[derive(Debug, Clone)]
pub enum PlatformClipboard {
    MacOs(AppleScriptClipboard),
    Windows(PowerShellClipboard),
    Linux(LinuxClipboard),
    Unsupported(String),
}

impl PlatformClipboard {
    /// 根据编译目标的操作系统选择实现。
    pub fn detect() -> Self {
        Self::for_os(std::env::consts::OS)
    }

    pub fn for_os(os: &str) -> Self {
        match os {
            "macos" => Self::MacOs(AppleScriptClipboard),
            "windows" => Self::Windows(PowerShellClipboard),
            "linux" => Self::Linux(LinuxClipboard::default()),
            other => Self::Unsupported(other.to_string()),
        }
    }

    /// 用于日志的方案名称。
    pub fn variant_name(&self) -> &str {
        match self {
            Self::MacOs(_) => "macOS/osascript",
            Self::Windows(_) => "Windows/PowerShell",
            Self::Linux(_) => "Linux/xclip|wl-copy",
            Self::Unsupported(os) => os,
        }
    }
}

impl ClipboardWriter for PlatformClipboard {
    async fn write(&self, path: &Path) -> Result<(), ClipboardError> {
        log::info!("📋 使用剪贴板方案: {}", self.variant_name());

        match self {
            Self::MacOs(writer) => writer.write(path).await,
            Self::Windows(writer) => writer.write(path).await,
            Self::Linux(writer) => writer.write(path).await,
            Self::Unsupported(os) => Err(ClipboardError::UnsupportedOs(os.clone())),
        }
    }
}

// ============================================================================
// macOS — AppleScript
// ============================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct AppleScriptClipboard;

impl AppleScriptClipboard {
    const TOOL: &'static str = "osascript";

    /// 生成把文件内容以 GIF 类型放入剪贴板的 AppleScript。
    pub fn script_for(path: &Path) -> String {
        let escaped = path
            .to_string_lossy()
            .replace('\\', "\\\\")
            .replace('"', "\\\"");
        format!(
            r#"set the clipboard to (read (POSIX file "{}") as «class GIFf»)"#,
            escaped
        )
    }
}

impl ClipboardWriter for AppleScriptClipboard {
    async fn write(&self, path: &Path) -> Result<(), ClipboardError> {
        let mut command = Command::new(Self::TOOL);
        command.arg("-e").arg(Self::script_for(path));

        run_capturing_stderr(Self::TOOL, &mut command).await?;
        log::info!("✅ 已写入剪贴板 (macOS)");
        Ok(())
    }
}

// ============================================================================
// Windows — PowerShell FileDropList
// ============================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct PowerShellClipboard;

impl PowerShellClipboard {
    const TOOL: &'static str = "powershell";

    /// 生成把单个文件作为 FileDropList 提交到剪贴板的脚本。
    pub fn script_for(path: &Path) -> String {
        let escaped = path.to_string_lossy().replace('\'', "''");
        format!(
            "Add-Type -AssemblyName System.Windows.Forms\n\
             $file = Get-Item -LiteralPath '{}'\n\
             $files = New-Object System.Collections.Specialized.StringCollection\n\
             [void]$files.Add($file.FullName)\n\
             $data = New-Object System.Windows.Forms.DataObject\n\
             $data.SetFileDropList($files)\n\
             [System.Windows.Forms.Clipboard]::SetDataObject($data, $true)\n",
            escaped
        )
    }
}

impl ClipboardWriter for PowerShellClipboard {
    async fn write(&self, path: &Path) -> Result<(), ClipboardError> {
        let mut command = Command::new(Self::TOOL);
        command
            .args(["-NoProfile", "-NonInteractive", "-STA", "-Command"])
            .arg(Self::script_for(path));

        #[cfg(target_os = "windows")]
        {
            const CREATE_NO_WINDOW: u32 = 0x0800_0000;
            command.creation_flags(CREATE_NO_WINDOW);
        }

        run_capturing_stderr(Self::TOOL, &mut command).await?;
        log::info!("✅ 已写入剪贴板 (Windows)");
        Ok(())
    }
}

// ============================================================================
// Linux — xclip / wl-copy
// ============================================================================

/// 文件交给剪贴板工具的方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileInput {
    /// 追加为最后一个命令行参数。
    Argument,
    /// 作为标准输入。
    Stdin,
}

/// 一个命令行剪贴板工具的调用方式。
#[derive(Debug, Clone)]
pub struct ClipboardUtility {
    program: String,
    args: Vec<String>,
    input: FileInput,
}

impl ClipboardUtility {
    pub fn new<I, S>(program: impl Into<String>, args: I, input: FileInput) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            input,
        }
    }

    /// X11：`xclip -selection clipboard -t image/gif -i <path>`
    pub fn xclip() -> Self {
        Self::new(
            "xclip",
            ["-selection", "clipboard", "-t", GIF_MIME, "-i"],
            FileInput::Argument,
        )
    }

    /// Wayland：`wl-copy --type image/gif < <path>`
    pub fn wl_copy() -> Self {
        Self::new("wl-copy", ["--type", GIF_MIME], FileInput::Stdin)
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    async fn run(&self, path: &Path) -> Result<(), ClipboardError> {
        let mut command = Command::new(&self.program);
        command.args(&self.args).stdout(Stdio::null());

        match self.input {
            FileInput::Argument => {
                command.arg(path).stdin(Stdio::null());
            }
            FileInput::Stdin => {
                command.stdin(Stdio::from(File::open(path)?));
            }
        }

        let mut diagnostics = tempfile::tempfile()?;
        command.stderr(Stdio::from(diagnostics.try_clone()?));

        let status = command.status().await.map_err(|source| ClipboardError::Launch {
            tool: self.program.clone(),
            source,
        })?;

        if status.success() {
            return Ok(());
        }

        diagnostics.seek(SeekFrom::Start(0))?;
        let mut stderr = Vec::new();
        diagnostics.read_to_end(&mut stderr)?;

        Err(ClipboardError::ToolFailed {
            tool: self.program.clone(),
            diagnostic: describe_failure(&stderr, status),
        })
    }
}

/// 首选工具未安装时回退到备用工具。
#[derive(Debug, Clone)]
pub struct LinuxClipboard {
    primary: ClipboardUtility,
    fallback: ClipboardUtility,
}

impl Default for LinuxClipboard {
    fn default() -> Self {
        Self::new(ClipboardUtility::xclip(), ClipboardUtility::wl_copy())
    }
}

impl LinuxClipboard {
    pub fn new(primary: ClipboardUtility, fallback: ClipboardUtility) -> Self {
        Self { primary, fallback }
    }
}

impl ClipboardWriter for LinuxClipboard {
    async fn write(&self, path: &Path) -> Result<(), ClipboardError> {
        let result = match self.primary.run(path).await {
            Err(err) if is_not_installed(&err) => {
                log::warn!(
                    "⚠️ 未找到 {}，改用 {}",
                    self.primary.program(),
                    self.fallback.program()
                );
                match self.fallback.run(path).await {
                    Err(err) if is_not_installed(&err) => {
                        log::error!(
                            "❌ {} 与 {} 均未安装",
                            self.primary.program(),
                            self.fallback.program()
                        );
                        return Err(ClipboardError::NoSupportedUtility);
                    }
                    other => other.map(|()| self.fallback.program()),
                }
            }
            other => other.map(|()| self.primary.program()),
        };

        let tool = result?;
        log::info!("✅ 已写入剪贴板 (Linux/{})", tool);
        Ok(())
    }
}

// ============================================================================
// 辅助函数
// ============================================================================

/// 运行不会常驻后台的工具，通过管道收集 stderr。
async fn run_capturing_stderr(tool: &str, command: &mut Command) -> Result<(), ClipboardError> {
    let output = command
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|source| ClipboardError::Launch {
            tool: tool.to_string(),
            source,
        })?;

    if output.status.success() {
        return Ok(());
    }

    let diagnostic = describe_failure(&output.stderr, output.status);
    log::error!("{} 执行失败: {}", tool, diagnostic);

    Err(ClipboardError::ToolFailed {
        tool: tool.to_string(),
        diagnostic,
    })
}

fn describe_failure(stderr: &[u8], status: ExitStatus) -> String {
    let text = String::from_utf8_lossy(stderr);
    let text = text.trim();
    if text.is_empty() {
        format!("exited with {}", status)
    } else {
        text.to_string()
    }
}

fn is_not_installed(err: &ClipboardError) -> bool {
    matches!(err, ClipboardError::Launch { source, .. } if source.kind() == io::ErrorKind::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MISSING_TOOL: &str = "copy-gif-host-test-no-such-clipboard-tool";

    fn sample_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".gif")
            .tempfile()
            .expect("create sample file failed");
        std::io::Write::write_all(&mut file, b"GIF89a").expect("write sample failed");
        file
    }

    #[test]
    fn platform_selection_covers_three_variants() {
        assert!(matches!(PlatformClipboard::for_os("macos"), PlatformClipboard::MacOs(_)));
        assert!(matches!(PlatformClipboard::for_os("windows"), PlatformClipboard::Windows(_)));
        assert!(matches!(PlatformClipboard::for_os("linux"), PlatformClipboard::Linux(_)));
        assert!(matches!(
            PlatformClipboard::for_os("freebsd"),
            PlatformClipboard::Unsupported(ref os) if os == "freebsd"
        ));
    }

    #[tokio::test]
    async fn unsupported_os_fails_immediately() {
        let writer = PlatformClipboard::for_os("haiku");

        let result = writer.write(Path::new("/nonexistent.gif")).await;

        assert!(matches!(result, Err(ClipboardError::UnsupportedOs(ref os)) if os == "haiku"));
    }

    #[test]
    fn applescript_escapes_quotes_and_backslashes() {
        let script = AppleScriptClipboard::script_for(Path::new(r#"/tmp/a "b"\c.gif"#));

        assert_eq!(
            script,
            r#"set the clipboard to (read (POSIX file "/tmp/a \"b\"\\c.gif") as «class GIFf»)"#
        );
    }

    #[test]
    fn powershell_script_uses_literal_path_and_file_drop_list() {
        let script = PowerShellClipboard::script_for(Path::new(r"C:\Temp\it's.gif"));

        assert!(script.contains(r"Get-Item -LiteralPath 'C:\Temp\it''s.gif'"));
        assert!(script.contains("SetFileDropList($files)"));
        assert!(script.contains("SetDataObject($data, $true)"));
    }

    #[test]
    fn default_linux_utilities_request_gif_mime() {
        let xclip = ClipboardUtility::xclip();
        assert_eq!(xclip.program(), "xclip");
        assert!(xclip.args.iter().any(|a| a == GIF_MIME));
        assert_eq!(xclip.input, FileInput::Argument);

        let wl_copy = ClipboardUtility::wl_copy();
        assert_eq!(wl_copy.program(), "wl-copy");
        assert!(wl_copy.args.iter().any(|a| a == GIF_MIME));
        assert_eq!(wl_copy.input, FileInput::Stdin);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn linux_falls_back_when_primary_is_missing() {
        let file = sample_file();
        let writer = LinuxClipboard::new(
            ClipboardUtility::new(MISSING_TOOL, Vec::<String>::new(), FileInput::Argument),
            ClipboardUtility::new("cat", Vec::<String>::new(), FileInput::Stdin),
        );

        let result = writer.write(file.path()).await;

        assert!(result.is_ok(), "fallback should succeed: {:?}", result);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn linux_reports_no_utility_when_both_are_missing() {
        let file = sample_file();
        let writer = LinuxClipboard::new(
            ClipboardUtility::new(MISSING_TOOL, Vec::<String>::new(), FileInput::Argument),
            ClipboardUtility::new(MISSING_TOOL, Vec::<String>::new(), FileInput::Stdin),
        );

        let result = writer.write(file.path()).await;

        assert!(matches!(result, Err(ClipboardError::NoSupportedUtility)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn linux_non_zero_exit_carries_stderr_and_does_not_fall_back() {
        let file = sample_file();
        let writer = LinuxClipboard::new(
            ClipboardUtility::new(
                "sh",
                ["-c", "echo 'cannot open display' >&2; exit 3", "sh"],
                FileInput::Argument,
            ),
            ClipboardUtility::new("cat", Vec::<String>::new(), FileInput::Stdin),
        );

        let result = writer.write(file.path()).await;

        match result {
            Err(ClipboardError::ToolFailed { tool, diagnostic }) => {
                assert_eq!(tool, "sh");
                assert_eq!(diagnostic, "cannot open display");
            }
            other => panic!("expected ToolFailed, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn silent_failure_reports_exit_status() {
        let file = sample_file();
        let utility = ClipboardUtility::new("false", Vec::<String>::new(), FileInput::Argument);

        let result = utility.run(file.path()).await;

        assert!(matches!(
            result,
            Err(ClipboardError::ToolFailed { ref diagnostic, .. }) if diagnostic.starts_with("exited with")
        ));
    }
}
