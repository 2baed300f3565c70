//! # config 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/config.rs`

use clap::Args;

/// config 子命令参数
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Restore default settings
    #[arg(long, default_value_t = false)]
    pub reset: bool,

    /// Print the settings file as JSON
    #[arg(long, default_value_t = false, conflicts_with = "reset")]
    pub json: bool,
}
