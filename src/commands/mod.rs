//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `batch/`, `encoder/`, `models/`, `utils/`
//! - 子模块: encode, check, config

pub mod check;
pub mod config;
pub mod encode;

use crate::cli::Commands;
use crate::error::Result;
use crate::models::Mode;

use std::path::Path;

/// 执行命令
pub fn run(cmd: Commands, config_path: &Path) -> Result<()> {
    match cmd {
        Commands::Video(args) => encode::execute(Mode::VideoToGif, args, config_path),
        Commands::Images(args) => encode::execute(Mode::ImagesToGif, args, config_path),
        Commands::Optimize(args) => encode::execute(Mode::OptimizeGif, args, config_path),
        Commands::Check(args) => check::execute(args, config_path),
        Commands::Config(args) => config::execute(args, config_path),
    }
}
