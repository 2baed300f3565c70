//! # 文件工具函数
//!
//! 自然排序、文件大小读取与格式化。
//!
//! ## 依赖关系
//! - 被 `batch/collector.rs`, `encoder/gateway.rs`, `commands/` 使用
//! - 无外部模块依赖

use std::cmp::Ordering;
use std::path::Path;

/// 自然排序比较（`clip2` 排在 `clip10` 之前，忽略大小写）
///
/// 自然顺序相同的名称按原始字节序区分，保证全序。
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let lhs = take_digits(&mut left);
                let rhs = take_digits(&mut right);
                match compare_digit_runs(&lhs, &rhs) {
                    Ordering::Equal => continue,
                    other => return other,
                }
            }
            (Some(x), Some(y)) => {
                let ord = x.to_lowercase().cmp(y.to_lowercase());
                if ord != Ordering::Equal {
                    return ord;
                }
                left.next();
                right.next();
            }
        }
    }
}

fn take_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.peek().copied() {
        if !c.is_ascii_digit() {
            break;
        }
        run.push(c);
        chars.next();
    }
    run
}

/// 比较两个十进制数字串的数值大小（前导零无意义，不会溢出）
pub fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// 文件大小（字节），不存在时返回 0
pub fn file_size(path: &Path) -> u64 {
    path.metadata().map(|m| m.len()).unwrap_or(0)
}

/// 格式化文件大小
pub fn format_file_size(size_bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;

    if size_bytes < KB {
        format!("{} B", size_bytes)
    } else if size_bytes < MB {
        format!("{:.1} KB", size_bytes as f64 / KB as f64)
    } else {
        format!("{:.1} MB", size_bytes as f64 / MB as f64)
    }
}

/// 文件名主干（非 UTF-8 时有损转换）
pub fn stem_of(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// 文件名（非 UTF-8 时有损转换）
pub fn name_of(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_natural_order() {
        let mut names = vec!["clip10.mp4", "clip2.mp4", "Clip1.mp4", "abc.mp4"];
        names.sort_by(|a, b| natural_cmp(a, b));
        assert_eq!(names, vec!["abc.mp4", "Clip1.mp4", "clip2.mp4", "clip10.mp4"]);
    }

    #[test]
    fn test_natural_order_is_total() {
        assert_eq!(natural_cmp("file_01", "file_1"), "file_01".cmp("file_1"));
        assert_ne!(natural_cmp("A.gif", "a.gif"), Ordering::Equal);
    }

    #[test]
    fn test_compare_digit_runs() {
        assert_eq!(compare_digit_runs("001", "1"), Ordering::Equal);
        assert_eq!(compare_digit_runs("9", "10"), Ordering::Less);
        assert_eq!(
            compare_digit_runs("123456789012345678901234567890", "99"),
            Ordering::Greater
        );
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(512), "512 B");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(3 * 1024 * 1024), "3.0 MB");
    }
}
