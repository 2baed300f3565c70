//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `video`: 视频批量转 GIF
//! - `images`: 图片序列批量转 GIF
//! - `optimize`: 已有 GIF 批量重新编码
//! - `check`: 检查外部编码器
//! - `config`: 查看或重置持久化配置
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: encode, config

pub mod config;
pub mod encode;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// bulkgif - 批量 GIF 转换工具
#[derive(Parser)]
#[command(name = "bulkgif")]
#[command(version)]
#[command(about = "Batch-convert videos, image sequences and GIFs", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Settings file (default: bulkgif.json beside the executable)
    #[arg(long, global = true, env = "BULKGIF_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log file (default: log.txt beside the settings file)
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Write debug-level records to the log file
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Convert video files (.mp4 .avi .mov .mkv .webm) to GIFs
    Video(encode::EncodeArgs),

    /// Convert numbered image sequences (.png .jpg .jpeg .bmp) to GIFs
    Images(encode::EncodeArgs),

    /// Re-encode existing GIFs with new quality settings
    Optimize(encode::EncodeArgs),

    /// Report whether ffmpeg and gifski can be executed
    Check(encode::ToolArgs),

    /// Show or reset the persisted settings
    Config(config::ConfigArgs),
}
