//! # 临时文件守卫
//!
//! ## 设计思路
//!
//! 下载得到的 GIF 需要落盘后交给外部剪贴板工具，文件只在一次请求内有效。
//! `TempArtifact` 采用 RAII：创建即登记清理，`Drop` 时删除文件，
//! 无论请求成功、失败还是中途提前返回都会执行。
//!
//! ## 实现思路
//!
//! - 基于 `tempfile::TempPath`，但不用它自带的静默删除：
//!   这里调用 `close()` 拿到删除结果，失败只记 `warn`，从不向上抛出。
//! - 文件名固定为 `copygif_*.gif`，部分平台按扩展名识别剪贴板内容。

use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempPath;

const ARTIFACT_PREFIX: &str = "copygif_";
const ARTIFACT_SUFFIX: &str = ".gif";

/// 单次请求独占的临时 GIF 文件。
#[derive(Debug)]
pub struct TempArtifact {
    path: PathBuf,
    temp: Option<TempPath>,
}

impl TempArtifact {
    /// 在 `dir`（缺省为系统临时目录）下创建一个空的 `.gif` 临时文件。
    pub fn create(dir: Option<&Path>) -> io::Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(ARTIFACT_PREFIX).suffix(ARTIFACT_SUFFIX);

        let file = match dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };

        let temp = file.into_temp_path();
        let path = temp.to_path_buf();
        log::debug!("🗂️ 已创建临时文件: {}", path.display());

        Ok(Self {
            path,
            temp: Some(temp),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 立即删除文件。失败只记录日志。
    pub fn cleanup(mut self) {
        self.release();
    }

    fn release(&mut self) {
        let Some(temp) = self.temp.take() else {
            return;
        };

        match temp.close() {
            Ok(()) => log::info!("🧹 已清理临时文件: {}", self.path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("临时文件已不存在: {}", self.path.display());
            }
            Err(e) => log::warn!("⚠️ 清理临时文件失败: {} ({})", self.path.display(), e),
        }
    }
}

impl Drop for TempArtifact {
    fn drop(&mut self) {
        self.release();
    }
}
