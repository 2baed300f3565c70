//! # 批处理规划
//!
//! 单线程、同步地构造本次运行的工作项列表，完成后才会启动任何工作线程。
//!
//! ## 流程
//! 1. 参数范围检查
//! 2. 校验输入目录，创建输出目录
//! 3. 按模式扩展名收集文件（图片模式再按序列分组）；
//!    优化模式下输入输出为同一目录时忽略已有的优化输出
//! 4. 按命名规则计算输出路径
//! 5. 测试运行只保留第一个工作项
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs` 调用
//! - 使用 `batch/collector.rs`, `batch/grouper.rs`

use super::collector::FileCollector;
use super::grouper::group_images;
use crate::error::{BulkGifError, Result};
use crate::models::settings::is_optimized_name;
use crate::models::{EncodeSettings, Mode, WorkItem};
use crate::utils::files::{name_of, stem_of};

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 一次批处理请求
#[derive(Debug, Clone)]
pub struct BatchRequest {
    pub mode: Mode,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub settings: EncodeSettings,
    /// 只处理第一个工作项，且不应用跳过策略
    pub test_only: bool,
    /// 保留视频抽帧目录 `temp_<name>/`
    pub keep_frames: bool,
}

/// 规划结果
#[derive(Debug, Clone)]
pub struct BatchPlan {
    pub mode: Mode,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// 扫描到的输入文件数
    pub discovered: usize,
    /// 按派发顺序排列的工作项
    pub items: Vec<WorkItem>,
}

/// 规划一次运行
pub fn plan(request: &BatchRequest) -> Result<BatchPlan> {
    request.settings.validate()?;

    let input_dir = absolute_dir(&request.input_dir)?;
    if !input_dir.is_dir() {
        return Err(BulkGifError::DirectoryNotFound {
            path: request.input_dir.display().to_string(),
        });
    }
    let output_dir = prepare_output_dir(&request.output_dir)?;

    let mut files = FileCollector::new(&input_dir)
        .with_extensions(request.mode.extensions())
        .collect()?;

    if request.mode == Mode::OptimizeGif && same_dir(&input_dir, &output_dir) {
        let before = files.len();
        files.retain(|f| !is_optimized_name(&name_of(f)));
        if files.len() < before {
            debug!(
                ignored = before - files.len(),
                "Ignoring optimized GIFs already in the output folder"
            );
        }
    }

    info!(
        mode = %request.mode,
        input = %input_dir.display(),
        files = files.len(),
        "Discovered input files"
    );

    if files.is_empty() {
        return Err(BulkGifError::NoFilesFound {
            mode: request.mode,
            path: input_dir.display().to_string(),
        });
    }

    // (显示名称, 命名主干, 输入文件)
    let units: Vec<(String, String, Vec<PathBuf>)> = match request.mode {
        Mode::ImagesToGif => {
            let groups = group_images(&files);
            if groups.is_empty() {
                return Err(BulkGifError::NoGroupsDetected {
                    path: input_dir.display().to_string(),
                });
            }
            for group in &groups {
                debug!(group = %group.key, members = group.members.len(), "Detected image group");
            }
            groups
                .into_iter()
                .map(|g| (g.key.clone(), g.key, g.members))
                .collect()
        }
        Mode::VideoToGif | Mode::OptimizeGif => files
            .into_iter()
            .map(|f| (name_of(&f), stem_of(&f), vec![f]))
            .collect(),
    };

    let discovered = units.iter().map(|(_, _, sources)| sources.len()).sum();
    let mut temp_names = HashSet::new();

    let mut items: Vec<WorkItem> = units
        .into_iter()
        .enumerate()
        .map(|(id, (name, stem, source_paths))| {
            let file_name = request
                .mode
                .output_file_name(&stem, &request.settings, request.test_only);
            let temp_dir = match request.mode {
                Mode::VideoToGif => {
                    Some(output_dir.join(unique_temp_name(&stem, id, &mut temp_names)))
                }
                _ => None,
            };

            WorkItem {
                id,
                kind: request.mode,
                name,
                source_paths,
                output_path: output_dir.join(file_name),
                temp_dir,
                is_test: request.test_only,
            }
        })
        .collect();

    if request.test_only {
        items.truncate(1);
        info!("Test mode: processing first item only");
    }

    Ok(BatchPlan {
        mode: request.mode,
        input_dir,
        output_dir,
        discovered,
        items,
    })
}

/// 抽帧目录名 `temp_<stem>`，同一计划内重名时追加 id
fn unique_temp_name(stem: &str, id: usize, taken: &mut HashSet<String>) -> String {
    let preferred = format!("temp_{}", stem);
    if taken.insert(preferred.clone()) {
        return preferred;
    }
    let fallback = format!("temp_{}_{}", stem, id);
    taken.insert(fallback.clone());
    fallback
}

fn same_dir(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

fn absolute_dir(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).map_err(|_| BulkGifError::DirectoryNotFound {
        path: path.display().to_string(),
    })
}

/// 输出目录不存在时创建；存在但不是目录时报错
fn prepare_output_dir(path: &Path) -> Result<PathBuf> {
    let dir = absolute_dir(path)?;
    if dir.exists() && !dir.is_dir() {
        return Err(BulkGifError::DirectoryNotFound {
            path: path.display().to_string(),
        });
    }
    fs::create_dir_all(&dir).map_err(|e| BulkGifError::FileWriteError {
        path: dir.display().to_string(),
        source: e,
    })?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, names: &[&str]) {
        for name in names {
            fs::write(dir.join(name), b"x").unwrap();
        }
    }

    fn request(mode: Mode, input: &Path, output: &Path) -> BatchRequest {
        BatchRequest {
            mode,
            input_dir: input.to_path_buf(),
            output_dir: output.to_path_buf(),
            settings: EncodeSettings::default(),
            test_only: false,
            keep_frames: false,
        }
    }

    #[test]
    fn test_plan_videos() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        touch(input.path(), &["clip2.mp4", "clip1.mp4", "readme.txt"]);

        let plan = plan(&request(Mode::VideoToGif, input.path(), output.path())).unwrap();
        assert_eq!(plan.items.len(), 2);
        assert_eq!(plan.discovered, 2);

        let first = &plan.items[0];
        assert_eq!(first.id, 0);
        assert_eq!(first.name, "clip1.mp4");
        assert_eq!(first.output_path, output.path().join("clip1.gif"));
        assert_eq!(first.temp_dir, Some(output.path().join("temp_clip1")));
        assert!(!first.is_test);
        assert_eq!(plan.items[1].output_path, output.path().join("clip2.gif"));
    }

    #[test]
    fn test_plan_images_groups() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        touch(input.path(), &["scene (1).png", "scene (2).png", "logo.png"]);

        let plan = plan(&request(Mode::ImagesToGif, input.path(), output.path())).unwrap();
        assert_eq!(plan.discovered, 3);
        let names: Vec<&str> = plan.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["logo", "scene"]);
        assert_eq!(plan.items[1].source_paths.len(), 2);
        assert_eq!(plan.items[1].output_path, output.path().join("scene.gif"));
        assert!(plan.items.iter().all(|i| i.temp_dir.is_none()));
    }

    #[test]
    fn test_plan_optimize_naming_and_test_mode() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        touch(input.path(), &["b.gif", "a.GIF"]);

        let mut req = request(Mode::OptimizeGif, input.path(), output.path());
        req.settings.quality = 70;
        req.settings.fps = 20.0;
        req.test_only = true;

        let plan = plan(&req).unwrap();
        assert_eq!(plan.items.len(), 1);
        assert_eq!(plan.items[0].name, "a.GIF");
        assert_eq!(
            plan.items[0].output_path,
            output.path().join("test_a_optim_70q_20fps.gif")
        );
        assert!(plan.items[0].is_test);
    }

    #[test]
    fn test_plan_optimize_in_place_ignores_previous_outputs() {
        let dir = TempDir::new().unwrap();
        touch(
            dir.path(),
            &["mygif.gif", "mygif_optim_70q_20fps.gif", "test_old_optim_50q_10fps.gif"],
        );

        let in_place = plan(&request(Mode::OptimizeGif, dir.path(), dir.path())).unwrap();
        let names: Vec<&str> = in_place.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["mygif.gif"]);

        // 不同目录时照常处理
        let output = TempDir::new().unwrap();
        let elsewhere = plan(&request(Mode::OptimizeGif, dir.path(), output.path())).unwrap();
        assert_eq!(elsewhere.items.len(), 3);
    }

    #[test]
    fn test_plan_duplicate_video_stems_get_distinct_temp_dirs() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        touch(input.path(), &["a.mp4", "a.mov"]);

        let plan = plan(&request(Mode::VideoToGif, input.path(), output.path())).unwrap();
        let temps: Vec<PathBuf> = plan.items.iter().filter_map(|i| i.temp_dir.clone()).collect();
        assert_eq!(temps.len(), 2);
        assert_ne!(temps[0], temps[1]);
    }

    #[test]
    fn test_plan_errors() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();

        let err = plan(&request(Mode::VideoToGif, input.path(), output.path())).unwrap_err();
        assert!(matches!(err, BulkGifError::NoFilesFound { .. }));

        let missing = input.path().join("missing");
        let err = plan(&request(Mode::VideoToGif, &missing, output.path())).unwrap_err();
        assert!(matches!(err, BulkGifError::DirectoryNotFound { .. }));

        touch(input.path(), &["clip.mp4", "blocker"]);
        let err = plan(&request(
            Mode::VideoToGif,
            input.path(),
            &input.path().join("blocker"),
        ))
        .unwrap_err();
        assert!(matches!(err, BulkGifError::DirectoryNotFound { .. }));

        let mut req = request(Mode::VideoToGif, input.path(), output.path());
        req.settings.quality = 0;
        assert!(matches!(plan(&req), Err(BulkGifError::InvalidSetting(_))));
    }

    #[test]
    fn test_plan_creates_output_dir() {
        let input = TempDir::new().unwrap();
        touch(input.path(), &["clip.mp4"]);
        let out = input.path().join("out").join("gifs");

        plan(&request(Mode::VideoToGif, input.path(), &out)).unwrap();
        assert!(out.is_dir());
    }
}
