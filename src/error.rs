//! # 统一错误处理模块
//!
//! 定义 bulkgif 的所有错误类型，使用 `thiserror` 派生。
//!
//! 运行级错误（目录、空输入、编码器缺失、参数非法）在工作线程启动前返回；
//! 单项错误（抽帧、合成失败）在工作线程边界转换为 `ItemOutcome::Failed`。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 依赖 `models::Mode`（仅用于错误信息）

use crate::models::Mode;
use thiserror::Error;

/// bulkgif 统一错误类型
#[derive(Error, Debug)]
pub enum BulkGifError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 规划错误
    // ─────────────────────────────────────────────────────────────
    #[error("No {mode} input files found in {path}")]
    NoFilesFound { mode: Mode, path: String },

    #[error("No image groups detected in {path}")]
    NoGroupsDetected { path: String },

    // ─────────────────────────────────────────────────────────────
    // 外部编码器错误
    // ─────────────────────────────────────────────────────────────
    #[error("Encoder '{command}' is not available: {reason}")]
    EncoderNotAvailable { command: String, reason: String },

    #[error("External command '{command}' not found")]
    CommandNotFound { command: String },

    #[error("Frame extraction failed (exit code {}):\n{stderr_tail}", fmt_code(.exit_code))]
    FrameExtractionFailed {
        exit_code: Option<i32>,
        stderr_tail: String,
    },

    #[error("GIF synthesis failed (exit code {}):\n{stderr_tail}", fmt_code(.exit_code))]
    GifSynthesisFailed {
        exit_code: Option<i32>,
        stderr_tail: String,
    },

    // ─────────────────────────────────────────────────────────────
    // 参数与配置错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid setting: {0}")]
    InvalidSetting(String),

    #[error("Invalid config file {path}: {reason}")]
    ConfigError { path: String, reason: String },

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

fn fmt_code(code: &Option<i32>) -> String {
    match code {
        Some(c) => c.to_string(),
        None => "none".to_string(),
    }
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, BulkGifError>;
