//! # 帧集合与参数策略
//!
//! ## 功能
//! - `FrameArgStrategy`: 按帧数选择逐个路径传参或通配符传参（纯函数）
//! - `TempFrameSet`: 单个工作项独占的临时帧目录，drop 时删除（除非要求保留）
//! - 超过阈值的零散图片先暂存为连续编号的帧目录，再以通配符引用
//!
//! ## 依赖关系
//! - 被 `encoder/gateway.rs` 使用
//! - 使用 `glob` 在非 Windows 平台展开通配符

use crate::error::{BulkGifError, Result};
use crate::utils::files::{name_of, natural_cmp};

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// 逐个传递帧路径的最大帧数，超过则改用通配符
pub const INDIVIDUAL_FRAME_LIMIT: usize = 50;

/// 帧文件名前缀
pub const FRAME_PREFIX: &str = "frame_";

/// 引用帧目录内全部帧的通配符（相对帧目录）
pub const FRAME_PATTERN: &str = "frame_*";

/// ffmpeg 输出帧文件名模板
pub const FFMPEG_FRAME_TEMPLATE: &str = "frame_%06d.png";

/// 帧参数传递策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameArgStrategy {
    /// 逐个传递路径，顺序完全由调用方决定
    Individual,
    /// 传递一个引用帧目录的通配符，避免命令行超长
    Pattern,
}

impl FrameArgStrategy {
    pub fn for_frame_count(count: usize) -> Self {
        if count > INDIVIDUAL_FRAME_LIMIT {
            FrameArgStrategy::Pattern
        } else {
            FrameArgStrategy::Individual
        }
    }
}

/// 帧文件名（6 位零填充，字典序即数值序）
pub fn frame_file_name(index: usize, extension: &str) -> String {
    format!("{}{:06}.{}", FRAME_PREFIX, index, extension)
}

fn is_frame_file(path: &Path) -> bool {
    path.is_file() && name_of(path).starts_with(FRAME_PREFIX)
}

/// 临时帧目录
///
/// 由创建它的编码调用独占；drop 时删除，除非设置了保留标志
/// （此时目录作为输出目录中的产物永久保留）。
#[derive(Debug)]
pub struct TempFrameSet {
    dir: PathBuf,
    retain: bool,
}

impl TempFrameSet {
    /// 创建（或复用）目录，并清除上次遗留的帧文件
    pub fn create(dir: impl Into<PathBuf>, retain: bool) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| BulkGifError::FileWriteError {
            path: dir.display().to_string(),
            source: e,
        })?;

        let set = TempFrameSet { dir, retain };
        for stale in set.frames()? {
            fs::remove_file(&stale).map_err(|e| BulkGifError::FileWriteError {
                path: stale.display().to_string(),
                source: e,
            })?;
        }
        Ok(set)
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// 目录内的帧文件，按编号排序
    pub fn frames(&self) -> Result<Vec<PathBuf>> {
        let entries = fs::read_dir(&self.dir).map_err(|e| BulkGifError::FileReadError {
            path: self.dir.display().to_string(),
            source: e,
        })?;

        let mut frames: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| is_frame_file(p))
            .collect();
        frames.sort_by(|a, b| natural_cmp(&name_of(a), &name_of(b)));
        Ok(frames)
    }
}

impl Drop for TempFrameSet {
    fn drop(&mut self) {
        if self.retain {
            debug!(dir = %self.dir.display(), "Keeping extracted frames");
            return;
        }
        if let Err(e) = fs::remove_dir_all(&self.dir) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(
                    dir = %self.dir.display(),
                    error = %e,
                    "Failed to remove temp frame directory"
                );
            }
        }
    }
}

/// 若帧列表恰好是某个目录内按 `frame_000001` 起连续编号的全部帧文件，返回该目录
///
/// 只有零填充的连续编号才保证通配符展开顺序与帧顺序一致。
pub fn shared_frame_dir(frames: &[PathBuf]) -> Option<PathBuf> {
    let dir = frames.first()?.parent()?.to_path_buf();

    let all_numbered = frames.iter().enumerate().all(|(i, f)| {
        let extension = f
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();
        f.parent() == Some(dir.as_path()) && name_of(f) == frame_file_name(i + 1, &extension)
    });
    if !all_numbered {
        return None;
    }

    let on_disk = fs::read_dir(&dir)
        .ok()?
        .filter_map(|e| e.ok())
        .filter(|e| is_frame_file(&e.path()))
        .count();

    (on_disk == frames.len()).then_some(dir)
}

/// 将任意帧按给定顺序暂存为连续编号的帧目录（硬链接，失败时复制）
pub fn stage_frames(frames: &[PathBuf], scratch_dir: &Path) -> Result<TempFrameSet> {
    let staged = TempFrameSet::create(scratch_dir, false)?;

    for (i, source) in frames.iter().enumerate() {
        let extension = source
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_else(|| "png".to_string());
        let target = staged.path().join(frame_file_name(i + 1, &extension));

        fs::hard_link(source, &target)
            .or_else(|_| fs::copy(source, &target).map(|_| ()))
            .map_err(|e| BulkGifError::FileWriteError {
                path: target.display().to_string(),
                source: e,
            })?;
    }

    debug!(
        dir = %staged.path().display(),
        frames = frames.len(),
        "Staged frames for pattern invocation"
    );
    Ok(staged)
}

/// 展开帧目录内的通配符，返回按名称排序的文件名（相对帧目录）
pub fn expand_pattern(dir: &Path) -> Result<Vec<String>> {
    let pattern = format!(
        "{}/{}",
        glob::Pattern::escape(&dir.to_string_lossy()),
        FRAME_PATTERN
    );

    let paths = glob::glob(&pattern)
        .map_err(|e| BulkGifError::Other(format!("Invalid frame pattern '{}': {}", pattern, e)))?;

    let mut names: Vec<String> = paths
        .filter_map(|p| p.ok())
        .filter(|p| p.is_file())
        .map(|p| name_of(&p))
        .collect();
    names.sort();
    Ok(names)
}
