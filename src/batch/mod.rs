//! # 批量处理模块
//!
//! 从输入目录到工作项、再到并行编码的完整流程。
//!
//! ## 功能
//! - 按模式扩展名收集输入文件
//! - 图片序列分组
//! - 输出已存在即跳过（断点续跑）
//! - 并行派发、事件汇总与取消
//!
//! ## 依赖关系
//! - 被 `commands/encode.rs` 使用
//! - 使用 `rayon` 进行并行处理
//! - 使用 `crossbeam-channel` 汇总事件

pub mod collector;
pub mod events;
pub mod grouper;
pub mod planner;
pub mod runner;
pub mod skip;

pub use events::{BatchEvent, CancelToken, EventSink};
pub use planner::BatchRequest;
pub use runner::BatchOrchestrator;
