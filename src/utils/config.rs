//! # 持久化配置
//!
//! 保存编码参数默认值、编码器路径与上次使用的目录，格式为 JSON。
//!
//! ## 功能
//! - 部分字段缺失时以默认值补全
//! - 文件不存在时以默认值创建；损坏时警告并使用默认值
//! - 转换为核心使用的 `EncodeSettings` 与 `EncoderTools`
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `serde_json`

use crate::encoder::EncoderTools;
use crate::error::{BulkGifError, Result};
use crate::models::EncodeSettings;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// 默认配置文件名
pub const CONFIG_FILE_NAME: &str = "bulkgif.json";

/// 应用配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    // 编码参数
    pub quality: u8,
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub lossy_quality: u8,
    pub motion_quality: u8,

    /// 视频模式是否保留抽帧目录
    pub keep_temp_files: bool,

    // 上次使用的目录
    pub last_input_folder: String,
    pub last_output_folder: String,

    // 编码器
    pub ffmpeg_path: String,
    pub gifski_path: String,
    /// 并行作业数，0 表示可用 CPU 数
    pub jobs: usize,
    /// 单次外部调用超时（秒），0 表示不限
    pub timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            quality: 70,
            width: 320,
            height: 0,
            fps: 20.0,
            lossy_quality: 80,
            motion_quality: 80,
            keep_temp_files: true,
            last_input_folder: String::new(),
            last_output_folder: String::new(),
            ffmpeg_path: "ffmpeg".to_string(),
            gifski_path: "gifski".to_string(),
            jobs: 0,
            timeout_secs: 300,
        }
    }
}

impl AppConfig {
    /// 可执行文件旁的 `bulkgif.json`，无法确定时使用当前目录
    pub fn default_path() -> PathBuf {
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join(CONFIG_FILE_NAME)))
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
    }

    /// 读取配置
    ///
    /// 不会失败：文件缺失时写入默认值，无法解析时记录警告并返回默认值。
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            let config = Self::default();
            match config.save(path) {
                Ok(()) => info!(path = %path.display(), "Created default config"),
                Err(e) => warn!(error = %e, "Could not create default config"),
            }
            return config;
        }

        match Self::read(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "Falling back to default settings");
                Self::default()
            }
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| BulkGifError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;
        serde_json::from_str(&contents).map_err(|e| BulkGifError::ConfigError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// 写入配置（格式化 JSON）
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| BulkGifError::FileWriteError {
                path: parent.display().to_string(),
                source: e,
            })?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|e| BulkGifError::ConfigError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        fs::write(path, json).map_err(|e| BulkGifError::FileWriteError {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// 恢复默认值并写入
    pub fn reset(path: &Path) -> Result<Self> {
        let config = Self::default();
        config.save(path)?;
        Ok(config)
    }

    pub fn encode_settings(&self) -> EncodeSettings {
        EncodeSettings {
            quality: self.quality,
            lossy_quality: self.lossy_quality,
            motion_quality: self.motion_quality,
            width: self.width,
            height: self.height,
            fps: self.fps,
        }
    }

    pub fn tools(&self) -> EncoderTools {
        EncoderTools {
            ffmpeg: PathBuf::from(&self.ffmpeg_path),
            gifski: PathBuf::from(&self.gifski_path),
            timeout: (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs)),
        }
    }

    /// 记录本次使用的目录
    pub fn remember_folders(&mut self, input: &Path, output: &Path) {
        self.last_input_folder = input.display().to_string();
        self.last_output_folder = output.display().to_string();
    }

    /// 上次使用的输入目录（未设置时为 None）
    pub fn last_input(&self) -> Option<PathBuf> {
        non_empty(&self.last_input_folder)
    }

    /// 上次使用的输出目录（未设置时为 None）
    pub fn last_output(&self) -> Option<PathBuf> {
        non_empty(&self.last_output_folder)
    }
}

fn non_empty(value: &str) -> Option<PathBuf> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| PathBuf::from(trimmed))
}
