//! # 跳过策略
//!
//! 输出文件已存在即视为该工作项已完成，用于中断后续跑。
//! 不比较内容或参数：修改参数后需清空输出目录才会重新处理。
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs` 调用

use std::path::Path;

/// 判断工作项是否应跳过
///
/// 测试运行从不跳过；否则当且仅当 `output_path` 处已有普通文件时跳过。
pub fn should_skip(output_path: &Path, is_test: bool) -> bool {
    if is_test {
        return false;
    }
    output_path.is_file()
}
