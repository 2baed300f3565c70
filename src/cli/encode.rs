//! # 编码子命令 CLI 定义
//!
//! `video`, `images`, `optimize` 共用的参数。未给出的参数取持久化配置中的值。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/encode.rs`

use clap::Args;
use std::path::PathBuf;

/// 编码子命令参数
#[derive(Args, Debug, Clone, Default)]
pub struct EncodeArgs {
    /// Input folder (default: last used input folder)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output folder (default: last used output folder)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Overall quality (1-100)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: Option<u8>,

    /// Lossy compression quality (1-100)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub lossy_quality: Option<u8>,

    /// Motion quality (1-100)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub motion_quality: Option<u8>,

    /// Output width in pixels (0 = source width)
    #[arg(long)]
    pub width: Option<u32>,

    /// Output height in pixels (0 = source height)
    #[arg(long)]
    pub height: Option<u32>,

    /// Frames per second
    #[arg(long)]
    pub fps: Option<f64>,

    /// Process only the first item, ignoring existing outputs
    #[arg(long, default_value_t = false)]
    pub test: bool,

    /// Number of parallel jobs (0 = auto)
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Keep extracted video frames in temp_<name>/
    #[arg(long, default_value_t = false, conflicts_with = "discard_frames")]
    pub keep_frames: bool,

    /// Remove extracted video frames after each item
    #[arg(long, default_value_t = false)]
    pub discard_frames: bool,

    /// Timeout in seconds for each encoder call (0 = none)
    #[arg(long)]
    pub timeout: Option<u64>,

    #[command(flatten)]
    pub tools: ToolArgs,

    /// Do not remember the input/output folders
    #[arg(long, default_value_t = false)]
    pub no_save: bool,
}

impl EncodeArgs {
    /// 帧保留设置：命令行优先，否则使用配置
    pub fn keep_frames_or(&self, configured: bool) -> bool {
        if self.keep_frames {
            true
        } else if self.discard_frames {
            false
        } else {
            configured
        }
    }
}

/// 编码器位置
#[derive(Args, Debug, Clone, Default)]
pub struct ToolArgs {
    /// ffmpeg executable
    #[arg(long, env = "BULKGIF_FFMPEG")]
    pub ffmpeg: Option<PathBuf>,

    /// gifski executable
    #[arg(long, env = "BULKGIF_GIFSKI")]
    pub gifski: Option<PathBuf>,
}
