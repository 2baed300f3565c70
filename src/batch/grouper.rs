//! # 图片序列分组
//!
//! 将一组图片文件名按末尾编号划分为动画序列。
//!
//! ## 规则
//! 去掉扩展名后依次尝试：
//! 1. 括号形式：`<base> (<digits>)`（括号前必须有空白或 `_`/`-`）
//! 2. 分隔符形式：`<base>` + `_`/`-`/单个空格 + `<digits>`（位于末尾）
//!
//! 匹配成功时 GroupKey 为去掉末尾分隔符和空白的 `<base>`，组内按编号数值升序，
//! 数值相同（不同零填充）时按文件名字典序。不匹配的文件以完整主干作为单元素组。
//! 纯函数，无 I/O，无失败路径。
//!
//! ## 依赖关系
//! - 被 `batch/planner.rs` 调用
//! - 使用 `regex`

use crate::utils::files::{compare_digit_runs, name_of, stem_of};

use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

static PARENTHESIZED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<base>.*?)[_\-\s]\((?P<num>\d+)\)$").unwrap());

static SEPARATED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<base>.*?)[_\- ](?P<num>\d+)$").unwrap());

/// 一个图片序列分组
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageGroup {
    /// 分组键（输出 GIF 的文件名主干）
    pub key: String,
    /// 组内有序成员
    pub members: Vec<PathBuf>,
}

/// 从文件名主干解析出的序列信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceName {
    /// 分组键
    pub key: String,
    /// 末尾编号的数字串（未匹配时为 None）
    pub number: Option<String>,
}

/// 解析文件名主干
pub fn parse_stem(stem: &str) -> SequenceName {
    for pattern in [&*PARENTHESIZED, &*SEPARATED] {
        if let Some(caps) = pattern.captures(stem) {
            let base = caps["base"]
                .trim_end_matches(|c: char| c == '_' || c == '-' || c.is_whitespace());
            if !base.is_empty() {
                return SequenceName {
                    key: base.to_string(),
                    number: Some(caps["num"].to_string()),
                };
            }
        }
    }

    SequenceName {
        key: stem.to_string(),
        number: None,
    }
}

/// 将图片列表分组，返回按 GroupKey 排序的分组
pub fn group_images(paths: &[PathBuf]) -> Vec<ImageGroup> {
    let mut groups: BTreeMap<String, Vec<(Option<String>, &Path)>> = BTreeMap::new();

    for path in paths {
        let parsed = parse_stem(&stem_of(path));
        groups
            .entry(parsed.key)
            .or_default()
            .push((parsed.number, path.as_path()));
    }

    groups
        .into_iter()
        .map(|(key, mut members)| {
            members.sort_by(|(na, pa), (nb, pb)| {
                compare_numbers(na.as_deref(), nb.as_deref())
                    .then_with(|| name_of(pa).cmp(&name_of(pb)))
            });
            ImageGroup {
                key,
                members: members.into_iter().map(|(_, p)| p.to_path_buf()).collect(),
            }
        })
        .collect()
}

/// 未编号的成员排在编号成员之前
fn compare_numbers(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => compare_digit_runs(a, b),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
