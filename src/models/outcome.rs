//! # 处理结果数据模型
//!
//! 单项结果 `ItemOutcome` 与整批汇总 `BatchResult`。
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs` 聚合
//! - 被 `commands/encode.rs` 展示

use super::Mode;
use serde::Serialize;
use std::path::PathBuf;

/// 优化前后的文件大小（字节）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SizeChange {
    pub original: u64,
    pub new: u64,
}

impl SizeChange {
    /// 体积缩减百分比（原始为 0 时返回 0）
    pub fn reduction_percent(&self) -> f64 {
        if self.original == 0 {
            return 0.0;
        }
        (self.original as f64 - self.new as f64) / self.original as f64 * 100.0
    }
}

/// 单个工作项的最终结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ItemOutcome {
    /// 成功生成输出
    Succeeded {
        output: PathBuf,
        /// 仅 GIF 优化模式
        sizes: Option<SizeChange>,
    },
    /// 输出已存在，跳过
    Skipped { reason: String },
    /// 处理失败
    Failed { reason: String },
    /// 取消信号到达时尚未完成
    Cancelled,
}

impl ItemOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            ItemOutcome::Succeeded { .. } => "succeeded",
            ItemOutcome::Skipped { .. } => "skipped",
            ItemOutcome::Failed { .. } => "failed",
            ItemOutcome::Cancelled => "cancelled",
        }
    }
}

/// 单项报告
#[derive(Debug, Clone, Serialize)]
pub struct ItemReport {
    pub id: usize,
    pub name: String,
    pub output_path: PathBuf,
    pub outcome: ItemOutcome,
}

/// 批量处理结果统计
#[derive(Debug, Clone, Serialize)]
pub struct BatchResult {
    /// 运行模式
    pub mode: Mode,
    /// 计划处理的工作项数量
    pub total: usize,
    /// 成功数量
    pub processed: usize,
    /// 跳过数量
    pub skipped: usize,
    /// 失败数量
    pub failed: usize,
    /// 取消数量
    pub cancelled: usize,
    /// 各项结果，按 id 排序
    pub reports: Vec<ItemReport>,
    /// 累计大小（仅 GIF 优化模式，只统计成功项）
    pub size_totals: Option<SizeChange>,
}

impl BatchResult {
    pub fn new(mode: Mode, total: usize) -> Self {
        BatchResult {
            mode,
            total,
            processed: 0,
            skipped: 0,
            failed: 0,
            cancelled: 0,
            reports: Vec::with_capacity(total),
            size_totals: match mode {
                Mode::OptimizeGif => Some(SizeChange::default()),
                _ => None,
            },
        }
    }

    /// 合并单项结果
    pub fn merge(&mut self, report: ItemReport) {
        match &report.outcome {
            ItemOutcome::Succeeded { sizes, .. } => {
                self.processed += 1;
                if let (Some(totals), Some(sizes)) = (self.size_totals.as_mut(), sizes) {
                    totals.original += sizes.original;
                    totals.new += sizes.new;
                }
            }
            ItemOutcome::Skipped { .. } => self.skipped += 1,
            ItemOutcome::Failed { .. } => self.failed += 1,
            ItemOutcome::Cancelled => self.cancelled += 1,
        }
        self.reports.push(report);
    }

    /// 已汇报的数量
    pub fn reported(&self) -> usize {
        self.processed + self.skipped + self.failed + self.cancelled
    }

    /// 失败详情 (名称, 原因)
    pub fn failures(&self) -> impl Iterator<Item = (&str, &str)> {
        self.reports.iter().filter_map(|r| match &r.outcome {
            ItemOutcome::Failed { reason } => Some((r.name.as_str(), reason.as_str())),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(id: usize, outcome: ItemOutcome) -> ItemReport {
        ItemReport {
            id,
            name: format!("item{}", id),
            output_path: PathBuf::from(format!("item{}.gif", id)),
            outcome,
        }
    }

    #[test]
    fn test_merge_counts() {
        let mut result = BatchResult::new(Mode::VideoToGif, 4);
        result.merge(report(
            0,
            ItemOutcome::Succeeded {
                output: PathBuf::from("a.gif"),
                sizes: None,
            },
        ));
        result.merge(report(
            1,
            ItemOutcome::Skipped {
                reason: "exists".into(),
            },
        ));
        result.merge(report(
            2,
            ItemOutcome::Failed {
                reason: "boom".into(),
            },
        ));
        result.merge(report(3, ItemOutcome::Cancelled));

        assert_eq!(result.processed, 1);
        assert_eq!(result.skipped, 1);
        assert_eq!(result.failed, 1);
        assert_eq!(result.cancelled, 1);
        assert_eq!(result.reported(), 4);
        assert!(result.size_totals.is_none());

        let failures: Vec<_> = result.failures().collect();
        assert_eq!(failures, vec![("item2", "boom")]);
    }

    #[test]
    fn test_optimize_totals_only_count_successes() {
        let mut result = BatchResult::new(Mode::OptimizeGif, 2);
        result.merge(report(
            0,
            ItemOutcome::Succeeded {
                output: PathBuf::from("a.gif"),
                sizes: Some(SizeChange {
                    original: 1000,
                    new: 400,
                }),
            },
        ));
        result.merge(report(
            1,
            ItemOutcome::Failed {
                reason: "x".into(),
            },
        ));

        let totals = result.size_totals.unwrap();
        assert_eq!(totals.original, 1000);
        assert_eq!(totals.new, 400);
        assert!((totals.reduction_percent() - 60.0).abs() < 1e-9);
    }
}
