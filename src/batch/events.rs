//! # 批处理事件流
//!
//! 编排器向调用方报告进度的唯一通道。
//!
//! ## 功能
//! - `BatchEvent`: 单项进度事件与最终汇总
//! - `EventSink`: 事件接收接口（闭包或 crossbeam 通道发送端均可）
//! - `CancelToken`: 协作式取消信号，工作线程在阶段之间检查
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs` 发出
//! - 被 `commands/encode.rs` 消费

use crate::models::{BatchResult, ItemOutcome};

use crossbeam_channel::Sender;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// 工作项处理阶段
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    Starting,
    Skipping,
    ExtractingFrames,
    Synthesizing { frames: usize },
    Optimizing,
    Finished,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Starting => write!(f, "starting"),
            Stage::Skipping => write!(f, "output exists, skipping"),
            Stage::ExtractingFrames => write!(f, "extracting frames"),
            Stage::Synthesizing { frames } => write!(f, "synthesizing {} frames", frames),
            Stage::Optimizing => write!(f, "optimizing"),
            Stage::Finished => write!(f, "finished"),
        }
    }
}

/// 单项进度事件
///
/// 完成顺序不确定，事件总是携带工作项的稳定 id 与序号。
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressEvent {
    pub item_id: usize,
    /// 从 1 开始
    pub item_index: usize,
    pub item_count: usize,
    pub item_name: String,
    pub stage: Stage,
    /// 仅在工作项结束时存在
    pub outcome: Option<ItemOutcome>,
}

#[derive(Debug, Clone)]
pub enum BatchEvent {
    Progress(ProgressEvent),
    /// 所有已派发工作项汇报后发出，恰好一次
    Summary(BatchResult),
}

/// 事件接收接口
pub trait EventSink {
    fn on_event(&mut self, event: &BatchEvent);
}

impl<F: FnMut(&BatchEvent)> EventSink for F {
    fn on_event(&mut self, event: &BatchEvent) {
        self(event)
    }
}

impl EventSink for Sender<BatchEvent> {
    fn on_event(&mut self, event: &BatchEvent) {
        // 接收端已关闭时丢弃事件
        let _ = self.send(event.clone());
    }
}

/// 协作式取消信号
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Mode;

    fn progress(stage: Stage) -> BatchEvent {
        BatchEvent::Progress(ProgressEvent {
            item_id: 2,
            item_index: 3,
            item_count: 12,
            item_name: "clip.mp4".to_string(),
            stage,
            outcome: None,
        })
    }

    #[test]
    fn test_stage_descriptions() {
        assert_eq!(Stage::ExtractingFrames.to_string(), "extracting frames");
        assert_eq!(
            Stage::Synthesizing { frames: 42 }.to_string(),
            "synthesizing 42 frames"
        );
    }

    #[test]
    fn test_closure_sink() {
        let mut seen = Vec::new();
        {
            let mut sink = |event: &BatchEvent| {
                if let BatchEvent::Progress(p) = event {
                    seen.push(p.stage.clone());
                }
            };
            sink.on_event(&progress(Stage::Starting));
            sink.on_event(&progress(Stage::Optimizing));
        }
        assert_eq!(seen, vec![Stage::Starting, Stage::Optimizing]);
    }

    #[test]
    fn test_channel_sink() {
        let (mut tx, rx) = crossbeam_channel::unbounded::<BatchEvent>();
        tx.on_event(&BatchEvent::Summary(BatchResult::new(Mode::VideoToGif, 0)));
        drop(tx);
        let events: Vec<BatchEvent> = rx.iter().collect();
        assert!(matches!(events.as_slice(), [BatchEvent::Summary(_)]));
    }

    #[test]
    fn test_cancel_token_is_shared() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!token.is_cancelled());
        clone.cancel();
        assert!(token.is_cancelled());
    }
}
