//! # 工作项数据模型
//!
//! 一次编排运行中由规划阶段构造的不可变工作单元。
//!
//! ## 依赖关系
//! - 由 `batch/planner.rs` 构造
//! - 被 `batch/runner.rs` 消费

use super::Mode;
use serde::Serialize;
use std::path::PathBuf;

/// 单个工作项
///
/// 构造后不可变，由工作线程恰好消费一次，不会自动重试。
#[derive(Debug, Clone, Serialize)]
pub struct WorkItem {
    /// 稳定序号（规划顺序，从 0 开始）
    pub id: usize,

    /// 工作类型，与运行模式一致
    pub kind: Mode,

    /// 显示名称（视频/GIF 文件名或图片分组键）
    pub name: String,

    /// 输入文件（视频/GIF 为单个路径，图片分组为有序帧列表）
    pub source_paths: Vec<PathBuf>,

    /// 输出 GIF 路径
    pub output_path: PathBuf,

    /// 抽帧临时目录（仅视频模式）
    pub temp_dir: Option<PathBuf>,

    /// 是否为测试运行
    pub is_test: bool,
}

impl WorkItem {
    /// 从 1 开始的显示序号
    pub fn index(&self) -> usize {
        self.id + 1
    }

    /// 主输入文件
    pub fn primary_source(&self) -> Option<&PathBuf> {
        self.source_paths.first()
    }
}
