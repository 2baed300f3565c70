//! # 处理模式与编码参数
//!
//! `Mode` 决定输入扩展名与输出命名规则；`EncodeSettings` 为传给外部编码器的不可变参数值。
//!
//! ## 依赖关系
//! - 被 `batch/`, `encoder/`, `commands/` 使用
//! - 被 `utils/config.rs` 构造

use crate::error::{BulkGifError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// 视频模式接受的扩展名
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mov", "mkv", "webm"];
/// 图片序列模式接受的扩展名
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp"];
/// GIF 优化模式接受的扩展名
pub const GIF_EXTENSIONS: &[&str] = &["gif"];

/// 优化模式输出文件名 `[test_]<stem>_optim_<q>q_<fps>fps.gif`
static OPTIMIZED_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^.+_optim_\d+q_\d+(\.\d+)?fps\.gif$").unwrap());

/// 批处理模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    VideoToGif,
    ImagesToGif,
    OptimizeGif,
}

impl Mode {
    /// 该模式接受的输入扩展名（小写，不含点）
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Mode::VideoToGif => VIDEO_EXTENSIONS,
            Mode::ImagesToGif => IMAGE_EXTENSIONS,
            Mode::OptimizeGif => GIF_EXTENSIONS,
        }
    }

    /// 根据命名规则计算输出文件名
    ///
    /// `stem` 为视频/GIF 的文件名主干，或图片分组的 GroupKey。
    pub fn output_file_name(self, stem: &str, settings: &EncodeSettings, is_test: bool) -> String {
        let base = match self {
            Mode::VideoToGif | Mode::ImagesToGif => stem.to_string(),
            Mode::OptimizeGif => format!(
                "{}_optim_{}q_{}fps",
                stem, settings.quality, settings.fps
            ),
        };

        if is_test {
            format!("test_{}.gif", base)
        } else {
            format!("{}.gif", base)
        }
    }
}

/// 文件名是否符合优化模式的输出命名规则（与本次参数无关）
pub fn is_optimized_name(file_name: &str) -> bool {
    OPTIMIZED_NAME.is_match(file_name)
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::VideoToGif => write!(f, "video"),
            Mode::ImagesToGif => write!(f, "image"),
            Mode::OptimizeGif => write!(f, "GIF"),
        }
    }
}

/// gifski 编码参数
///
/// 数值原样传给外部编码器，除范围检查外无字段间约束。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EncodeSettings {
    /// 整体质量 (1-100)
    pub quality: u8,
    /// 有损压缩质量 (1-100)
    pub lossy_quality: u8,
    /// 运动区域质量 (1-100)
    pub motion_quality: u8,
    /// 输出宽度，0 表示原始宽度
    pub width: u32,
    /// 输出高度，0 表示原始高度
    pub height: u32,
    /// 帧率 (> 0)
    pub fps: f64,
}

impl Default for EncodeSettings {
    fn default() -> Self {
        EncodeSettings {
            quality: 70,
            lossy_quality: 80,
            motion_quality: 80,
            width: 320,
            height: 0,
            fps: 20.0,
        }
    }
}

impl EncodeSettings {
    /// 检查各字段取值范围
    pub fn validate(&self) -> Result<()> {
        check_percent("quality", self.quality)?;
        check_percent("lossy quality", self.lossy_quality)?;
        check_percent("motion quality", self.motion_quality)?;

        if !self.fps.is_finite() || self.fps <= 0.0 {
            return Err(BulkGifError::InvalidSetting(format!(
                "fps must be positive, got {}",
                self.fps
            )));
        }

        Ok(())
    }
}

fn check_percent(name: &str, value: u8) -> Result<()> {
    if (1..=100).contains(&value) {
        Ok(())
    } else {
        Err(BulkGifError::InvalidSetting(format!(
            "{} must be between 1 and 100, got {}",
            name, value
        )))
    }
}
