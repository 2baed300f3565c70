//! # bulkgif - 批量 GIF 转换工具
//!
//! 将视频、编号图片序列或已有 GIF 批量转换为优化后的 GIF。
//! 抽帧交给 ffmpeg，合成与优化交给 gifski。
//!
//! ## 子命令
//! - `video`    - 视频转 GIF
//! - `images`   - 图片序列转 GIF
//! - `optimize` - 重新编码已有 GIF
//! - `check`    - 检查外部编码器
//! - `config`   - 查看或重置配置
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── batch/    (收集、分组、规划、并行编排)
//!   │     ├── encoder/  (外部编码器调用)
//!   │     └── models/   (数据模型)
//!   ├── utils/      (输出、进度条、配置、日志)
//!   └── error.rs    (错误处理)
//! ```

mod batch;
mod cli;
mod commands;
mod encoder;
mod error;
mod models;
mod utils;

use clap::Parser;
use cli::Cli;
use utils::config::AppConfig;
use utils::logging::{self, LOG_FILE_NAME};

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(AppConfig::default_path);
    let log_path = cli
        .log_file
        .clone()
        .unwrap_or_else(|| config_path.with_file_name(LOG_FILE_NAME));

    // guard 存活到进程结束
    let log_guard = match logging::init_logging(&log_path, cli.verbose) {
        Ok(guard) => Some(guard),
        Err(e) => {
            utils::output::print_warning(&format!("Logging disabled: {}", e));
            None
        }
    };

    if let Err(e) = commands::run(cli.command, &config_path) {
        tracing::error!(error = %e, "Command failed");
        utils::output::print_error(&format!("{}", e));
        drop(log_guard);
        std::process::exit(1);
    }
}
