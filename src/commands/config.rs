//! # config 命令实现
//!
//! 显示或重置持久化配置。
//!
//! ## 依赖关系
//! - 使用 `cli/config.rs` 定义的参数
//! - 使用 `utils/config.rs`

use crate::cli::config::ConfigArgs;
use crate::error::{BulkGifError, Result};
use crate::utils::config::AppConfig;
use crate::utils::output;

use std::path::Path;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct SettingRow {
    #[tabled(rename = "Setting")]
    key: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

impl SettingRow {
    fn new(key: &'static str, value: impl ToString) -> Self {
        SettingRow {
            key,
            value: value.to_string(),
        }
    }
}

/// 执行 config 命令
pub fn execute(args: ConfigArgs, config_path: &Path) -> Result<()> {
    let config = if args.reset {
        let config = AppConfig::reset(config_path)?;
        output::print_success(&format!(
            "Settings reset to defaults in '{}'",
            config_path.display()
        ));
        config
    } else {
        AppConfig::load(config_path)
    };

    if args.json {
        let json = serde_json::to_string_pretty(&config).map_err(|e| BulkGifError::ConfigError {
            path: config_path.display().to_string(),
            reason: e.to_string(),
        })?;
        println!("{}", json);
        return Ok(());
    }

    output::print_header(&format!("Settings ({})", config_path.display()));
    println!("{}", Table::new(setting_rows(&config)));
    Ok(())
}

fn setting_rows(config: &AppConfig) -> Vec<SettingRow> {
    let or_unset = |s: &str| {
        if s.is_empty() {
            "-".to_string()
        } else {
            s.to_string()
        }
    };

    vec![
        SettingRow::new("quality", config.quality),
        SettingRow::new("lossy_quality", config.lossy_quality),
        SettingRow::new("motion_quality", config.motion_quality),
        SettingRow::new("width", config.width),
        SettingRow::new("height", config.height),
        SettingRow::new("fps", config.fps),
        SettingRow::new("keep_temp_files", config.keep_temp_files),
        SettingRow::new("jobs", config.jobs),
        SettingRow::new("timeout_secs", config.timeout_secs),
        SettingRow::new("ffmpeg_path", &config.ffmpeg_path),
        SettingRow::new("gifski_path", &config.gifski_path),
        SettingRow::new("last_input_folder", or_unset(&config.last_input_folder)),
        SettingRow::new("last_output_folder", or_unset(&config.last_output_folder)),
    ]
}
