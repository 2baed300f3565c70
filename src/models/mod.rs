//! # 数据模型模块
//!
//! 定义批处理的模式、参数、工作项与结果模型。
//!
//! ## 依赖关系
//! - 被 `batch/`, `encoder/`, `commands/` 使用
//! - 子模块: settings, work_item, outcome

pub mod outcome;
pub mod settings;
pub mod work_item;

pub use outcome::{BatchResult, ItemOutcome, ItemReport, SizeChange};
pub use settings::{EncodeSettings, Mode};
pub use work_item::WorkItem;
