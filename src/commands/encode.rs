//! # 编码命令实现
//!
//! `video`, `images`, `optimize` 三个子命令的共同流程。
//!
//! ## 功能
//! - 合并持久化配置与命令行参数，得到不可变的 `EncodeSettings`
//! - Ctrl-C 触发取消信号
//! - 消费编排器事件流：进度条、逐项结果、汇总表
//! - 运行成功后记住输入/输出目录
//!
//! ## 依赖关系
//! - 使用 `cli/encode.rs` 定义的参数
//! - 使用 `batch/runner.rs`, `encoder/`
//! - 使用 `utils/config.rs`, `utils/output.rs`, `utils/progress.rs`

use crate::batch::{BatchEvent, BatchOrchestrator, BatchRequest, CancelToken, EventSink};
use crate::cli::encode::{EncodeArgs, ToolArgs};
use crate::encoder::{EncoderGateway, EncoderTools, SystemRunner};
use crate::error::{BulkGifError, Result};
use crate::models::{BatchResult, EncodeSettings, ItemOutcome, Mode};
use crate::utils::config::AppConfig;
use crate::utils::files::{format_file_size, name_of};
use crate::utils::{output, progress};

use indicatif::ProgressBar;
use std::path::Path;
use std::time::Duration;
use tabled::{Table, Tabled};
use tracing::warn;

/// 执行编码命令
pub fn execute(mode: Mode, args: EncodeArgs, config_path: &Path) -> Result<()> {
    let mut config = AppConfig::load(config_path);

    let settings = merge_settings(config.encode_settings(), &args);
    settings.validate()?;

    let input_dir = args
        .input
        .clone()
        .or_else(|| config.last_input())
        .ok_or_else(|| {
            BulkGifError::InvalidSetting("no input folder given (use --input)".to_string())
        })?;
    let output_dir = args
        .output
        .clone()
        .or_else(|| config.last_output())
        .ok_or_else(|| {
            BulkGifError::InvalidSetting("no output folder given (use --output)".to_string())
        })?;

    let request = BatchRequest {
        mode,
        input_dir,
        output_dir,
        settings,
        test_only: args.test,
        keep_frames: args.keep_frames_or(config.keep_temp_files),
    };

    let tools = resolve_tools(&config, &args.tools, args.timeout);
    let jobs = args.jobs.unwrap_or(config.jobs);
    let gateway = EncoderGateway::new(SystemRunner::new(), tools);
    let orchestrator = BatchOrchestrator::new(gateway, jobs);

    print_run_header(&request, orchestrator.jobs());

    let cancel = CancelToken::new();
    let handler_token = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || handler_token.cancel()) {
        warn!(error = %e, "Could not install Ctrl-C handler");
    }

    output::print_info("Press Ctrl-C to stop after the running items finish");
    let mut console = ConsoleSink::new(mode);
    let result = orchestrator.run(&request, &mut console, &cancel);
    console.finish();
    let result = result?;

    if !args.no_save {
        config.remember_folders(&request.input_dir, &request.output_dir);
        if let Err(e) = config.save(config_path) {
            output::print_warning(&format!("Could not save settings: {}", e));
        }
    }

    print_summary(&result);

    if result.cancelled > 0 {
        output::print_warning(&format!(
            "Run cancelled, {} item(s) not finished",
            result.cancelled
        ));
    }
    if result.failed > 0 {
        return Err(BulkGifError::Other(format!(
            "{} of {} item(s) failed, see the log for details",
            result.failed, result.total
        )));
    }

    output::print_done(&format!(
        "{} GIF(s) written to '{}'",
        result.processed,
        request.output_dir.display()
    ));
    Ok(())
}

/// 命令行参数覆盖配置中的编码参数
pub fn merge_settings(base: EncodeSettings, args: &EncodeArgs) -> EncodeSettings {
    EncodeSettings {
        quality: args.quality.unwrap_or(base.quality),
        lossy_quality: args.lossy_quality.unwrap_or(base.lossy_quality),
        motion_quality: args.motion_quality.unwrap_or(base.motion_quality),
        width: args.width.unwrap_or(base.width),
        height: args.height.unwrap_or(base.height),
        fps: args.fps.unwrap_or(base.fps),
    }
}

/// 命令行给出的编码器路径与超时覆盖配置
pub fn resolve_tools(
    config: &AppConfig,
    args: &ToolArgs,
    timeout_secs: Option<u64>,
) -> EncoderTools {
    let mut tools = config.tools();
    if let Some(ffmpeg) = &args.ffmpeg {
        tools.ffmpeg = ffmpeg.clone();
    }
    if let Some(gifski) = &args.gifski {
        tools.gifski = gifski.clone();
    }
    if let Some(secs) = timeout_secs {
        tools.timeout = (secs > 0).then(|| Duration::from_secs(secs));
    }
    tools
}

fn print_run_header(request: &BatchRequest, jobs: usize) {
    let title = match request.mode {
        Mode::VideoToGif => "Video -> GIF",
        Mode::ImagesToGif => "Images -> GIF",
        Mode::OptimizeGif => "Optimize GIF",
    };
    if request.test_only {
        output::print_header(&format!("{} (test run)", title));
    } else {
        output::print_header(title);
    }

    let s = &request.settings;
    output::print_kv("Input", &request.input_dir.display().to_string());
    output::print_kv("Output", &request.output_dir.display().to_string());
    output::print_kv(
        "Quality",
        &format!("{} (lossy {}, motion {})", s.quality, s.lossy_quality, s.motion_quality),
    );
    output::print_kv("Size", &format!("{} x {}", dimension(s.width), dimension(s.height)));
    output::print_kv("FPS", &s.fps.to_string());
    output::print_kv("Jobs", &jobs.to_string());
    if request.mode == Mode::VideoToGif {
        output::print_kv("Keep frames", &request.keep_frames.to_string());
    }
    println!();
}

fn dimension(value: u32) -> String {
    if value == 0 {
        "auto".to_string()
    } else {
        value.to_string()
    }
}

/// 终端事件消费者
///
/// 进度条在首个事件到达时创建（此时才知道工作项总数）。
struct ConsoleSink {
    mode: Mode,
    pb: Option<ProgressBar>,
}

impl ConsoleSink {
    fn new(mode: Mode) -> Self {
        Self { mode, pb: None }
    }

    fn bar(&mut self, count: usize) -> &ProgressBar {
        self.pb
            .get_or_insert_with(|| progress::create_progress_bar(count as u64, "Starting"))
    }

    fn finish(&mut self) {
        if let Some(pb) = self.pb.take() {
            pb.finish_and_clear();
        }
    }

    fn print_outcome(mode: Mode, name: &str, outcome: &ItemOutcome) {
        match outcome {
            ItemOutcome::Succeeded { output: path, sizes } => {
                let target = name_of(path);
                match (mode, sizes) {
                    (Mode::OptimizeGif, Some(sizes)) => output::print_conversion(
                        name,
                        &format!(
                            "{} ({} -> {}, {:.1}% smaller)",
                            target,
                            format_file_size(sizes.original),
                            format_file_size(sizes.new),
                            sizes.reduction_percent()
                        ),
                    ),
                    _ => output::print_conversion(name, &target),
                }
            }
            ItemOutcome::Skipped { reason } => {
                output::print_skip(&format!("{} ({})", name, reason));
            }
            ItemOutcome::Failed { reason } => output::print_item_failure(name, reason),
            ItemOutcome::Cancelled => output::print_cancelled(name),
        }
    }
}

impl EventSink for ConsoleSink {
    fn on_event(&mut self, event: &BatchEvent) {
        let mode = self.mode;
        match event {
            BatchEvent::Progress(p) => {
                let pb = self.bar(p.item_count);
                match &p.outcome {
                    None => pb.set_message(progress::item_message(
                        p.item_index,
                        p.item_count,
                        &p.item_name,
                        &p.stage.to_string(),
                    )),
                    Some(outcome) => {
                        pb.suspend(|| Self::print_outcome(mode, &p.item_name, outcome));
                        pb.inc(1);
                    }
                }
            }
            BatchEvent::Summary(_) => self.finish(),
        }
    }
}

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Result")]
    label: &'static str,
    #[tabled(rename = "Count")]
    value: String,
}

impl SummaryRow {
    fn new(label: &'static str, value: impl ToString) -> Self {
        SummaryRow {
            label,
            value: value.to_string(),
        }
    }
}

fn summary_rows(result: &BatchResult) -> Vec<SummaryRow> {
    let mut rows = vec![
        SummaryRow::new("Processed", result.processed),
        SummaryRow::new("Skipped", result.skipped),
        SummaryRow::new("Failed", result.failed),
    ];
    if result.cancelled > 0 {
        rows.push(SummaryRow::new("Cancelled", result.cancelled));
    }
    if let Some(totals) = result.size_totals {
        rows.push(SummaryRow::new("Original size", format_file_size(totals.original)));
        rows.push(SummaryRow::new("New size", format_file_size(totals.new)));
        rows.push(SummaryRow::new(
            "Reduction",
            format!("{:.1}%", totals.reduction_percent()),
        ));
    }
    rows
}

fn print_summary(result: &BatchResult) {
    output::print_separator();
    println!("{}", Table::new(summary_rows(result)));

    for (name, _) in result.failures() {
        output::print_error(&format!("Failed: {}", name));
    }
}
