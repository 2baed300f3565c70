//! # 工具函数模块
//!
//! 提供美化输出、进度条、配置持久化、日志初始化与文件工具。
//!
//! ## 依赖关系
//! - 被 `commands/`, `batch/`, `encoder/` 使用
//! - 子模块: config, files, logging, output, progress

pub mod config;
pub mod files;
pub mod logging;
pub mod output;
pub mod progress;
