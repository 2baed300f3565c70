//! # 文件收集器
//!
//! 在输入目录中收集符合模式扩展名的文件。
//!
//! ## 功能
//! - 扩展名匹配（忽略大小写）
//! - 只扫描目录顶层
//! - 按文件名自然排序，保证结果确定
//!
//! ## 依赖关系
//! - 被 `batch/planner.rs` 调用
//! - 使用 `walkdir` 遍历目录

use crate::error::{BulkGifError, Result};
use crate::utils::files::{name_of, natural_cmp};

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 文件收集器
pub struct FileCollector {
    /// 输入目录
    input: PathBuf,
    /// 接受的扩展名（小写，不含点）
    extensions: Vec<String>,
}

impl FileCollector {
    /// 创建新的文件收集器
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            extensions: Vec::new(),
        }
    }

    /// 设置接受的扩展名
    pub fn with_extensions(mut self, extensions: &[&str]) -> Self {
        self.extensions = extensions
            .iter()
            .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        self
    }

    /// 收集所有匹配的文件
    ///
    /// 目录不存在或不是目录时返回 `DirectoryNotFound`；无匹配文件时返回空列表。
    pub fn collect(&self) -> Result<Vec<PathBuf>> {
        if !self.input.is_dir() {
            return Err(BulkGifError::DirectoryNotFound {
                path: self.input.display().to_string(),
            });
        }

        let mut files: Vec<PathBuf> = WalkDir::new(&self.input)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| self.matches_extension(e.path()))
            .map(|e| e.into_path())
            .collect();

        files.sort_by(|a, b| natural_cmp(&name_of(a), &name_of(b)));
        Ok(files)
    }

    /// 检查扩展名是否被接受
    fn matches_extension(&self, path: &Path) -> bool {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => {
                let ext = ext.to_ascii_lowercase();
                self.extensions.iter().any(|accepted| *accepted == ext)
            }
            None => false,
        }
    }
}
