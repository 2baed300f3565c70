//! # 批量编排器
//!
//! 系统中唯一有状态、并发的组件。
//!
//! ## 功能
//! - 规划完成后才启动工作线程（规划与执行严格先后）
//! - 基于 rayon 线程池按规划顺序 FIFO 派发工作项
//! - 工作线程只通过 crossbeam 通道发送事件，由调用线程单点汇总
//! - 阶段之间检查取消信号
//! - 所有工作项汇报后发出一次汇总事件
//!
//! ## 依赖关系
//! - 被 `commands/encode.rs` 调用
//! - 使用 `batch/planner.rs`, `batch/skip.rs`, `encoder/gateway.rs`
//! - 使用 `rayon` 线程池与 `crossbeam-channel`

use super::events::{BatchEvent, CancelToken, EventSink, ProgressEvent, Stage};
use super::planner::{plan, BatchRequest};
use super::skip::should_skip;
use crate::encoder::{EncoderGateway, ProcessRunner, TempFrameSet, Tool};
use crate::error::{BulkGifError, Result};
use crate::models::{BatchResult, ItemOutcome, ItemReport, Mode, WorkItem};

use crossbeam_channel::Sender;
use std::thread;
use tracing::{debug, error, info, warn};

/// 批量编排器
pub struct BatchOrchestrator<R: ProcessRunner> {
    gateway: EncoderGateway<R>,
    /// 并行作业数
    jobs: usize,
}

impl<R: ProcessRunner> BatchOrchestrator<R> {
    /// `jobs` 为 0 时使用可用 CPU 数
    pub fn new(gateway: EncoderGateway<R>, jobs: usize) -> Self {
        let jobs = if jobs == 0 { num_cpus::get() } else { jobs };
        Self { gateway, jobs }
    }

    pub fn gateway(&self) -> &EncoderGateway<R> {
        &self.gateway
    }

    pub fn jobs(&self) -> usize {
        self.jobs
    }

    /// 执行一次批处理
    ///
    /// 运行级错误（目录、无输入、无分组、编码器缺失、参数非法）在启动工作线程前返回；
    /// 单项错误记录为该项的失败，不影响其他工作项。
    pub fn run(
        &self,
        request: &BatchRequest,
        sink: &mut dyn EventSink,
        cancel: &CancelToken,
    ) -> Result<BatchResult> {
        let plan = plan(request)?;

        if plan.mode == Mode::VideoToGif {
            let version = self.gateway.probe(Tool::Ffmpeg)?;
            info!(version = %version, "Video decoder available");
        }

        let total = plan.items.len();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.jobs.min(total).max(1))
            .thread_name(|i| format!("bulkgif-worker-{}", i))
            .build()
            .map_err(|e| BulkGifError::Other(format!("Failed to start worker pool: {}", e)))?;

        info!(
            mode = %plan.mode,
            input = %plan.input_dir.display(),
            files = plan.discovered,
            items = total,
            jobs = pool.current_num_threads(),
            output = %plan.output_dir.display(),
            "Dispatching work items"
        );

        let items = &plan.items;
        let mut result = BatchResult::new(plan.mode, total);
        let (tx, rx) = crossbeam_channel::unbounded::<BatchEvent>();

        thread::scope(|scope| {
            scope.spawn(move || {
                pool.scope_fifo(|s| {
                    for item in items {
                        let tx = tx.clone();
                        s.spawn_fifo(move |_| self.process_item(item, total, request, &tx, cancel));
                    }
                });
                // tx 在此处释放，通道随之关闭
            });

            for event in rx.iter() {
                if let BatchEvent::Progress(progress) = &event {
                    if let Some(outcome) = &progress.outcome {
                        let output_path = items
                            .get(progress.item_id)
                            .map(|i| i.output_path.clone())
                            .unwrap_or_default();
                        result.merge(ItemReport {
                            id: progress.item_id,
                            name: progress.item_name.clone(),
                            output_path,
                            outcome: outcome.clone(),
                        });
                    }
                }
                sink.on_event(&event);
            }
        });

        if result.reported() != total {
            warn!(
                reported = result.reported(),
                total,
                "Some work items did not report an outcome"
            );
        }
        result.reports.sort_by_key(|r| r.id);

        info!(
            processed = result.processed,
            skipped = result.skipped,
            failed = result.failed,
            cancelled = result.cancelled,
            "Batch finished"
        );
        sink.on_event(&BatchEvent::Summary(result.clone()));
        Ok(result)
    }

    /// 工作线程：处理单个工作项并发送事件
    fn process_item(
        &self,
        item: &WorkItem,
        count: usize,
        request: &BatchRequest,
        tx: &Sender<BatchEvent>,
        cancel: &CancelToken,
    ) {
        let emit = |stage: Stage, outcome: Option<ItemOutcome>| {
            let _ = tx.send(BatchEvent::Progress(ProgressEvent {
                item_id: item.id,
                item_index: item.index(),
                item_count: count,
                item_name: item.name.clone(),
                stage,
                outcome,
            }));
        };

        if cancel.is_cancelled() {
            warn!(item = %item.name, "Cancelled before start");
            emit(Stage::Finished, Some(ItemOutcome::Cancelled));
            return;
        }

        if should_skip(&item.output_path, item.is_test) {
            warn!(
                item = %item.name,
                output = %item.output_path.display(),
                "Output exists, skipping"
            );
            emit(
                Stage::Skipping,
                Some(ItemOutcome::Skipped {
                    reason: "output already exists".to_string(),
                }),
            );
            return;
        }

        info!(item = %item.name, index = item.index(), count, "Starting item");
        emit(Stage::Starting, None);

        let outcome = match self.encode(item, request, cancel, &|stage: Stage| emit(stage, None)) {
            Ok(ItemOutcome::Cancelled) => {
                warn!(item = %item.name, "Cancelled between stages");
                ItemOutcome::Cancelled
            }
            Ok(outcome) => {
                info!(item = %item.name, output = %item.output_path.display(), "Item succeeded");
                outcome
            }
            Err(e) => {
                error!(item = %item.name, error = %e, "Item failed");
                ItemOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        };
        debug!(item = %item.name, outcome = outcome.label(), "Item finished");
        emit(Stage::Finished, Some(outcome));
    }

    /// 按工作项类型调用编码器
    fn encode(
        &self,
        item: &WorkItem,
        request: &BatchRequest,
        cancel: &CancelToken,
        stage: &dyn Fn(Stage),
    ) -> Result<ItemOutcome> {
        let settings = &request.settings;

        match item.kind {
            Mode::VideoToGif => {
                let video = item
                    .primary_source()
                    .ok_or_else(|| BulkGifError::Other(format!("'{}' has no input", item.name)))?;
                let temp_dir = item
                    .temp_dir
                    .clone()
                    .ok_or_else(|| {
                        BulkGifError::Other(format!("'{}' has no frame directory", item.name))
                    })?;

                // drop 时按保留设置清理，覆盖成功、失败与取消路径
                let frame_set = TempFrameSet::create(temp_dir, request.keep_frames)?;

                stage(Stage::ExtractingFrames);
                let frames = self.gateway.extract_frames(video, &frame_set, settings)?;
                if cancel.is_cancelled() {
                    return Ok(ItemOutcome::Cancelled);
                }

                stage(Stage::Synthesizing {
                    frames: frames.len(),
                });
                let output = self
                    .gateway
                    .synthesize_gif(&frames, &item.output_path, settings)?;
                Ok(ItemOutcome::Succeeded {
                    output,
                    sizes: None,
                })
            }
            Mode::ImagesToGif => {
                stage(Stage::Synthesizing {
                    frames: item.source_paths.len(),
                });
                let output = self
                    .gateway
                    .synthesize_gif(&item.source_paths, &item.output_path, settings)?;
                Ok(ItemOutcome::Succeeded {
                    output,
                    sizes: None,
                })
            }
            Mode::OptimizeGif => {
                let gif = item
                    .primary_source()
                    .ok_or_else(|| BulkGifError::Other(format!("'{}' has no input", item.name)))?;

                stage(Stage::Optimizing);
                let (output, sizes) = self.gateway.optimize_gif(gif, &item.output_path, settings)?;
                info!(
                    item = %item.name,
                    original = sizes.original,
                    new = sizes.new,
                    "Optimized GIF"
                );
                Ok(ItemOutcome::Succeeded {
                    output,
                    sizes: Some(sizes),
                })
            }
        }
    }
}
