//! # 外部编码器模块
//!
//! 封装对 ffmpeg（抽帧）与 gifski（合成/重新编码）的调用。
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs`, `commands/` 使用
//! - 子模块: process, frames, gateway

pub mod frames;
pub mod gateway;
pub mod process;

pub use frames::TempFrameSet;
pub use gateway::{EncoderGateway, EncoderTools, Tool};
pub use process::{ProcessRunner, SystemRunner};
