//! # 日志初始化
//!
//! 基于 `tracing` 的单文件追加日志：每个进程一个目标文件，不轮转。
//! 终端输出由 `utils/output.rs` 负责，不经过日志系统。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `tracing-subscriber`, `tracing-appender`

use crate::error::{BulkGifError, Result};

use std::fs;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 默认日志文件名
pub const LOG_FILE_NAME: &str = "log.txt";

/// 默认过滤规则（可被 `RUST_LOG` 覆盖）
fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "bulkgif=debug"
    } else {
        "bulkgif=info"
    }
}

/// 初始化日志系统
///
/// 返回的 guard 必须存活到进程结束，否则缓冲中的日志会丢失。
pub fn init_logging(log_path: &Path, verbose: bool) -> Result<WorkerGuard> {
    let dir = log_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = log_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| LOG_FILE_NAME.into());

    fs::create_dir_all(dir).map_err(|e| BulkGifError::FileWriteError {
        path: dir.display().to_string(),
        source: e,
    })?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .with_thread_names(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .try_init()
        .map_err(|e| BulkGifError::Other(format!("Failed to initialize logging: {}", e)))?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        log_file = %log_path.display(),
        "bulkgif session started"
    );

    Ok(guard)
}
