//! # check 命令实现
//!
//! 探测 ffmpeg 与 gifski 是否可执行并打印版本。
//!
//! ## 依赖关系
//! - 使用 `encoder/gateway.rs` 的 `probe`
//! - 使用 `utils/config.rs` 读取编码器路径

use super::encode::resolve_tools;
use crate::cli::encode::ToolArgs;
use crate::encoder::{EncoderGateway, SystemRunner, Tool};
use crate::error::{BulkGifError, Result};
use crate::utils::config::AppConfig;
use crate::utils::{output, progress};

use std::path::Path;

/// 执行 check 命令
pub fn execute(args: ToolArgs, config_path: &Path) -> Result<()> {
    let config = AppConfig::load(config_path);
    let tools = resolve_tools(&config, &args, None);
    let gateway = EncoderGateway::new(SystemRunner::new(), tools);

    output::print_header("Encoder check");

    let mut missing = 0;
    for tool in [Tool::Ffmpeg, Tool::Gifski] {
        let spinner = progress::create_spinner(&format!("Probing {}", tool));
        let probe = gateway.probe(tool);
        spinner.finish_and_clear();

        let program = gateway.tools().program(tool).display().to_string();
        match probe {
            Ok(version) => output::print_success(&format!("{} ({}): {}", tool, program, version)),
            Err(e) => {
                missing += 1;
                output::print_error(&e.to_string());
            }
        }
    }

    if missing > 0 {
        output::print_warning("Video mode needs ffmpeg; all modes need gifski");
        return Err(BulkGifError::Other(format!(
            "{} encoder(s) unavailable",
            missing
        )));
    }

    output::print_done("All encoders available");
    Ok(())
}
