//! # 外部编码器网关
//!
//! 将工作项转换为 ffmpeg / gifski 调用，并给出明确结果。
//!
//! ## 功能
//! - `extract_frames`: ffmpeg 按目标帧率抽取 PNG 帧
//! - `synthesize_gif`: gifski 由帧合成 GIF（超过 50 帧改用通配符）
//! - `optimize_gif`: gifski 重新编码已有 GIF，返回前后大小
//! - `probe`: 检查编码器是否可执行
//!
//! 输出先写入同目录下每次调用独占的 `.<output>.<tag>.part`，成功后原子重命名；
//! 失败时删除。所有操作不重试。
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs`, `commands/check.rs` 使用
//! - 使用 `encoder/process.rs`, `encoder/frames.rs`

use super::frames::{
    expand_pattern, shared_frame_dir, stage_frames, FrameArgStrategy, TempFrameSet,
    FFMPEG_FRAME_TEMPLATE, FRAME_PATTERN,
};
use super::process::{Invocation, ProcessOutput, ProcessRunner};
use crate::error::{BulkGifError, Result};
use crate::models::{EncodeSettings, SizeChange};
use crate::utils::files::{file_size, name_of, stem_of};

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::{debug, info};

/// 错误信息中保留的 stderr 行数
const STDERR_TAIL_LINES: usize = 20;

/// 探测编码器版本的超时
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// 外部编码器
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Ffmpeg,
    Gifski,
}

impl std::fmt::Display for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tool::Ffmpeg => write!(f, "ffmpeg"),
            Tool::Gifski => write!(f, "gifski"),
        }
    }
}

/// 编码器位置与单次调用超时
#[derive(Debug, Clone)]
pub struct EncoderTools {
    pub ffmpeg: PathBuf,
    pub gifski: PathBuf,
    /// 单次外部调用超时（None 表示不限）
    pub timeout: Option<Duration>,
}

impl Default for EncoderTools {
    fn default() -> Self {
        EncoderTools {
            ffmpeg: PathBuf::from("ffmpeg"),
            gifski: PathBuf::from("gifski"),
            timeout: Some(Duration::from_secs(300)),
        }
    }
}

impl EncoderTools {
    pub fn program(&self, tool: Tool) -> &Path {
        match tool {
            Tool::Ffmpeg => &self.ffmpeg,
            Tool::Gifski => &self.gifski,
        }
    }
}

/// 外部编码器网关
pub struct EncoderGateway<R: ProcessRunner> {
    runner: R,
    tools: EncoderTools,
    /// 临时写入路径序号
    write_seq: AtomicUsize,
}

impl<R: ProcessRunner> EncoderGateway<R> {
    pub fn new(runner: R, tools: EncoderTools) -> Self {
        EncoderGateway {
            runner,
            tools,
            write_seq: AtomicUsize::new(0),
        }
    }

    pub fn tools(&self) -> &EncoderTools {
        &self.tools
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// 检查编码器可执行，返回版本行
    pub fn probe(&self, tool: Tool) -> Result<String> {
        let program = self.tools.program(tool);
        let version_flag = match tool {
            Tool::Ffmpeg => "-version",
            Tool::Gifski => "--version",
        };
        let invocation = Invocation::new(program)
            .arg(version_flag)
            .capture_stdout()
            .timeout(PROBE_TIMEOUT);

        let unavailable = |reason: String| BulkGifError::EncoderNotAvailable {
            command: program.display().to_string(),
            reason,
        };

        let output = self.runner.run(&invocation).map_err(|e| unavailable(e.to_string()))?;
        if !output.success {
            return Err(unavailable(describe_failure(&output, Some(PROBE_TIMEOUT))));
        }

        let version = output
            .stdout
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .unwrap_or("unknown version")
            .to_string();
        debug!(tool = %tool, version = %version, "Encoder available");
        Ok(version)
    }

    /// 抽取视频帧到临时帧目录
    pub fn extract_frames(
        &self,
        video: &Path,
        frames: &TempFrameSet,
        settings: &EncodeSettings,
    ) -> Result<Vec<PathBuf>> {
        let video = absolute(video)?;
        let template = absolute(&frames.path().join(FFMPEG_FRAME_TEMPLATE))?;

        let mut invocation = Invocation::new(&self.tools.ffmpeg)
            .args(["-nostdin", "-hide_banner", "-y", "-i"])
            .arg(&video)
            .arg("-vf")
            .arg(format!("fps={}", settings.fps))
            .args(["-frame_pts", "0"])
            .arg(&template);
        if let Some(timeout) = self.tools.timeout {
            invocation = invocation.timeout(timeout);
        }

        let output = self
            .runner
            .run(&invocation)
            .map_err(|e| BulkGifError::FrameExtractionFailed {
                exit_code: None,
                stderr_tail: e.to_string(),
            })?;

        if !output.success {
            return Err(BulkGifError::FrameExtractionFailed {
                exit_code: output.exit_code,
                stderr_tail: describe_failure(&output, self.tools.timeout),
            });
        }

        let extracted = frames.frames()?;
        if extracted.is_empty() {
            return Err(BulkGifError::FrameExtractionFailed {
                exit_code: output.exit_code,
                stderr_tail: format!("no frames were produced from {}", name_of(&video)),
            });
        }

        info!(video = %name_of(&video), frames = extracted.len(), "Extracted frames");
        Ok(extracted)
    }

    /// 由有序帧合成 GIF
    pub fn synthesize_gif(
        &self,
        frames: &[PathBuf],
        output: &Path,
        settings: &EncodeSettings,
    ) -> Result<PathBuf> {
        if frames.is_empty() {
            return Err(BulkGifError::GifSynthesisFailed {
                exit_code: None,
                stderr_tail: "no frames to encode".to_string(),
            });
        }

        let output = absolute(output)?;
        let tag = self.next_tag();
        let part = part_path(&output, &tag);
        let invocation = self.gifski_invocation(&part, settings, true);

        // 暂存目录需存活到 gifski 结束
        let mut _staged = None;
        let invocation = match FrameArgStrategy::for_frame_count(frames.len()) {
            FrameArgStrategy::Individual => {
                let mut invocation = invocation;
                for frame in frames {
                    invocation = invocation.arg(absolute(frame)?);
                }
                invocation
            }
            FrameArgStrategy::Pattern => {
                let dir = match shared_frame_dir(frames) {
                    Some(dir) => dir,
                    None => {
                        let staged = stage_frames(frames, &scratch_dir(&output, &tag))?;
                        let dir = staged.path().to_path_buf();
                        _staged = Some(staged);
                        dir
                    }
                };
                with_frame_pattern(invocation, &absolute(&dir)?)?
            }
        };

        debug!(
            output = %name_of(&output),
            frames = frames.len(),
            command = %invocation.command_line(),
            "Running gifski"
        );
        self.run_gifski(&invocation, &part, &output)?;
        Ok(output)
    }

    /// 重新编码已有 GIF，返回 (输出路径, 前后大小)
    pub fn optimize_gif(
        &self,
        input: &Path,
        output: &Path,
        settings: &EncodeSettings,
    ) -> Result<(PathBuf, SizeChange)> {
        let input = absolute(input)?;
        let output = absolute(output)?;
        let part = part_path(&output, &self.next_tag());
        let original = file_size(&input);

        let invocation = self.gifski_invocation(&part, settings, false).arg(&input);
        debug!(command = %invocation.command_line(), "Running gifski");
        self.run_gifski(&invocation, &part, &output)?;

        let sizes = SizeChange {
            original,
            new: file_size(&output),
        };
        Ok((output, sizes))
    }

    /// gifski 公共参数（optimize 模式不传 --fps）
    fn gifski_invocation(
        &self,
        part: &Path,
        settings: &EncodeSettings,
        with_fps: bool,
    ) -> Invocation {
        let mut invocation = Invocation::new(&self.tools.gifski)
            .arg("-o")
            .arg(part)
            .arg("--quality")
            .arg(settings.quality.to_string());

        if settings.width > 0 {
            invocation = invocation.arg("--width").arg(settings.width.to_string());
        }
        if settings.height > 0 {
            invocation = invocation.arg("--height").arg(settings.height.to_string());
        }
        if with_fps {
            invocation = invocation.arg("--fps").arg(settings.fps.to_string());
        }

        invocation = invocation
            .arg("--lossy-quality")
            .arg(settings.lossy_quality.to_string())
            .arg("--motion-quality")
            .arg(settings.motion_quality.to_string());

        if let Some(timeout) = self.tools.timeout {
            invocation = invocation.timeout(timeout);
        }
        invocation
    }

    /// 本次调用独占的临时文件标记
    ///
    /// 同一计划内的两个工作项可能指向同一输出（如 `a.mp4` 与 `a.mov`）。
    fn next_tag(&self) -> String {
        let seq = self.write_seq.fetch_add(1, Ordering::Relaxed);
        format!("{}-{}", std::process::id(), seq)
    }

    /// 执行 gifski，成功后将 .part 重命名为最终输出
    fn run_gifski(&self, invocation: &Invocation, part: &Path, output: &Path) -> Result<()> {
        let result = self.runner.run(invocation);

        let failure = match result {
            Ok(out) if out.success && part.is_file() => {
                return fs::rename(part, output).map_err(|e| {
                    discard(part);
                    BulkGifError::FileWriteError {
                        path: output.display().to_string(),
                        source: e,
                    }
                });
            }
            Ok(out) if out.success => BulkGifError::GifSynthesisFailed {
                exit_code: out.exit_code,
                stderr_tail: "encoder reported success but wrote no output".to_string(),
            },
            Ok(out) => BulkGifError::GifSynthesisFailed {
                exit_code: out.exit_code,
                stderr_tail: describe_failure(&out, self.tools.timeout),
            },
            Err(e) => BulkGifError::GifSynthesisFailed {
                exit_code: None,
                stderr_tail: e.to_string(),
            },
        };

        discard(part);
        Err(failure)
    }
}

/// 以通配符引用帧目录：工作目录设为帧目录，参数相对该目录
///
/// Windows 下由编码器自行展开通配符；其他平台无 shell 展开，由本进程展开。
fn with_frame_pattern(invocation: Invocation, dir: &Path) -> Result<Invocation> {
    let invocation = invocation.current_dir(dir);
    if cfg!(windows) {
        Ok(invocation.arg(FRAME_PATTERN))
    } else {
        Ok(invocation.args(expand_pattern(dir)?))
    }
}

fn describe_failure(output: &ProcessOutput, timeout: Option<Duration>) -> String {
    let tail = output.stderr_tail(STDERR_TAIL_LINES);
    if output.timed_out {
        let secs = timeout.map(|t| t.as_secs()).unwrap_or_default();
        if tail.is_empty() {
            format!("timed out after {}s", secs)
        } else {
            format!("timed out after {}s\n{}", secs, tail)
        }
    } else if tail.is_empty() {
        "no error output".to_string()
    } else {
        tail
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).map_err(|e| BulkGifError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })
}

/// 输出的临时写入路径
pub fn part_path(output: &Path, tag: &str) -> PathBuf {
    output.with_file_name(format!(".{}.{}.part", name_of(output), tag))
}

/// 零散图片暂存目录
fn scratch_dir(output: &Path, tag: &str) -> PathBuf {
    output.with_file_name(format!(".stage_{}.{}", stem_of(output), tag))
}

fn discard(part: &Path) {
    if part.exists() {
        let _ = fs::remove_file(part);
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! 测试用假编码器：记录调用并生成真实编码器会产生的文件

    use super::*;
    use crate::encoder::frames::frame_file_name;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// 假编码器行为
    #[derive(Debug, Clone)]
    pub struct FakeBehavior {
        /// ffmpeg 每次生成的帧数
        pub frames_per_video: usize,
        /// 文件名包含该片段的输入会使 gifski 失败
        pub fail_gifski_on: Option<String>,
        /// ffmpeg 是否失败
        pub fail_ffmpeg: bool,
        /// ffmpeg 是否存在
        pub ffmpeg_installed: bool,
        /// 版本探测是否超时
        pub version_check_hangs: bool,
    }

    impl Default for FakeBehavior {
        fn default() -> Self {
            FakeBehavior {
                frames_per_video: 3,
                fail_gifski_on: None,
                fail_ffmpeg: false,
                ffmpeg_installed: true,
                version_check_hangs: false,
            }
        }
    }

    #[derive(Default)]
    pub struct FakeRunner {
        pub behavior: FakeBehavior,
        pub calls: Mutex<Vec<Invocation>>,
        pub gifski_runs: AtomicUsize,
    }

    impl FakeRunner {
        pub fn new(behavior: FakeBehavior) -> Self {
            FakeRunner {
                behavior,
                ..Default::default()
            }
        }

        pub fn calls(&self) -> Vec<Invocation> {
            self.calls.lock().unwrap().clone()
        }

        pub fn gifski_calls(&self) -> Vec<Invocation> {
            self.calls()
                .into_iter()
                .filter(|c| c.program_name().starts_with("gifski"))
                .collect()
        }

        fn run_ffmpeg(&self, invocation: &Invocation) -> Result<ProcessOutput> {
            if !self.behavior.ffmpeg_installed {
                return Err(BulkGifError::CommandNotFound {
                    command: invocation.program.display().to_string(),
                });
            }
            if invocation.has_arg("-version") && self.behavior.version_check_hangs {
                return Ok(ProcessOutput {
                    timed_out: true,
                    ..Default::default()
                });
            }
            if invocation.has_arg("-version") {
                return Ok(ProcessOutput {
                    stdout: "ffmpeg version 6.1-fake\n".to_string(),
                    ..ProcessOutput::ok()
                });
            }
            if self.behavior.fail_ffmpeg {
                return Ok(ProcessOutput::failed(1, "Invalid data found when processing input"));
            }

            let template = PathBuf::from(invocation.args.last().unwrap());
            let dir = template.parent().unwrap();
            for i in 1..=self.behavior.frames_per_video {
                fs::write(dir.join(frame_file_name(i, "png")), b"png").unwrap();
            }
            Ok(ProcessOutput::ok())
        }

        fn run_gifski(&self, invocation: &Invocation) -> Result<ProcessOutput> {
            if invocation.has_arg("--version") {
                return Ok(ProcessOutput {
                    stdout: "gifski 1.32.0\n".to_string(),
                    ..ProcessOutput::ok()
                });
            }
            self.gifski_runs.fetch_add(1, Ordering::SeqCst);

            if let Some(marker) = &self.behavior.fail_gifski_on {
                let hit = invocation
                    .args
                    .iter()
                    .any(|a| a.to_string_lossy().contains(marker.as_str()));
                if hit {
                    return Ok(ProcessOutput::failed(1, "error: unable to decode frame"));
                }
            }

            let output = invocation.arg_after("-o").unwrap().to_path_buf();
            let inputs = invocation.args.len();
            fs::write(&output, vec![b'G'; 10 + inputs]).unwrap();
            Ok(ProcessOutput::ok())
        }
    }

    impl ProcessRunner for FakeRunner {
        fn run(&self, invocation: &Invocation) -> Result<ProcessOutput> {
            self.calls.lock().unwrap().push(invocation.clone());
            if invocation.program_name().starts_with("ffmpeg") {
                self.run_ffmpeg(invocation)
            } else {
                self.run_gifski(invocation)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{FakeBehavior, FakeRunner};
    use super::*;
    use crate::encoder::frames::frame_file_name;
    use tempfile::TempDir;

    fn gateway(behavior: FakeBehavior) -> EncoderGateway<FakeRunner> {
        EncoderGateway::new(FakeRunner::new(behavior), EncoderTools::default())
    }

    fn part_files(dir: &Path) -> Vec<String> {
        fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .filter(|n| n.ends_with(".part"))
            .collect()
    }

    fn loose_images(dir: &Path, count: usize) -> Vec<PathBuf> {
        (1..=count)
            .map(|i| {
                let p = dir.join(format!("walk_{}.png", i));
                fs::write(&p, b"png").unwrap();
                p
            })
            .collect()
    }

    #[test]
    fn test_gifski_arguments() {
        let out = TempDir::new().unwrap();
        let input = TempDir::new().unwrap();
        let frames = loose_images(input.path(), 2);
        let settings = EncodeSettings {
            quality: 55,
            width: 0,
            height: 240,
            fps: 12.5,
            lossy_quality: 60,
            motion_quality: 70,
        };

        let gw = gateway(FakeBehavior::default());
        let output = out.path().join("walk.gif");
        gw.synthesize_gif(&frames, &output, &settings).unwrap();

        let call = &gw.runner.gifski_calls()[0];
        let part = call.arg_after("-o").unwrap();
        assert_eq!(part.parent(), Some(out.path()));
        assert!(name_of(part).starts_with(".walk.gif."));
        assert!(name_of(part).ends_with(".part"));
        assert_eq!(call.arg_after("--quality"), Some(Path::new("55")));
        assert!(!call.has_arg("--width"));
        assert_eq!(call.arg_after("--height"), Some(Path::new("240")));
        assert_eq!(call.arg_after("--fps"), Some(Path::new("12.5")));
        assert_eq!(call.arg_after("--lossy-quality"), Some(Path::new("60")));
        assert_eq!(call.arg_after("--motion-quality"), Some(Path::new("70")));
        assert_eq!(call.timeout, Some(Duration::from_secs(300)));
    }

    #[test]
    fn test_fifty_frames_passed_individually() {
        let out = TempDir::new().unwrap();
        let input = TempDir::new().unwrap();
        let frames = loose_images(input.path(), 50);

        let gw = gateway(FakeBehavior::default());
        let output = out.path().join("walk.gif");
        gw.synthesize_gif(&frames, &output, &EncodeSettings::default()).unwrap();

        let call = &gw.runner.gifski_calls()[0];
        assert_eq!(call.current_dir, None);
        let passed: Vec<PathBuf> = call.args[call.args.len() - 50..]
            .iter()
            .map(PathBuf::from)
            .collect();
        assert_eq!(passed, frames);
        assert!(output.is_file());
        assert!(part_files(out.path()).is_empty());
    }

    #[test]
    fn test_fifty_one_loose_frames_are_staged_for_pattern() {
        let out = TempDir::new().unwrap();
        let input = TempDir::new().unwrap();
        let frames = loose_images(input.path(), 51);

        let gw = gateway(FakeBehavior::default());
        let output = out.path().join("walk.gif");
        gw.synthesize_gif(&frames, &output, &EncodeSettings::default()).unwrap();

        let call = &gw.runner.gifski_calls()[0];
        let staging = call.current_dir.clone().unwrap();
        assert_eq!(staging.parent(), Some(out.path()));
        assert!(name_of(&staging).starts_with(".stage_walk."));
        assert!(!call.args.iter().any(|a| a.to_string_lossy().contains("walk_")));
        #[cfg(not(windows))]
        {
            assert!(call.has_arg(&frame_file_name(1, "png")));
            assert!(call.has_arg(&frame_file_name(51, "png")));
        }
        assert!(output.is_file());
        assert!(!staging.exists());
    }

    #[test]
    fn test_extracted_frames_use_their_own_directory() {
        let out = TempDir::new().unwrap();
        let set = TempFrameSet::create(out.path().join("temp_clip"), false).unwrap();
        let frames: Vec<PathBuf> = (1..=60)
            .map(|i| {
                let p = set.path().join(frame_file_name(i, "png"));
                fs::write(&p, b"png").unwrap();
                p
            })
            .collect();

        let gw = gateway(FakeBehavior::default());
        let output = out.path().join("clip.gif");
        gw.synthesize_gif(&frames, &output, &EncodeSettings::default()).unwrap();

        let call = &gw.runner.gifski_calls()[0];
        assert_eq!(call.current_dir.as_deref(), Some(set.path()));
        assert_eq!(fs::read_dir(out.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_unpadded_frame_names_are_staged_in_group_order() {
        let out = TempDir::new().unwrap();
        let input = TempDir::new().unwrap();
        let frames: Vec<PathBuf> = (1..=60)
            .map(|i| {
                let p = input.path().join(format!("frame_{}.png", i));
                fs::write(&p, format!("{}", i)).unwrap();
                p
            })
            .collect();

        let gw = gateway(FakeBehavior::default());
        let output = out.path().join("frame.gif");
        gw.synthesize_gif(&frames, &output, &EncodeSettings::default()).unwrap();

        let call = &gw.runner.gifski_calls()[0];
        let staging = call.current_dir.clone().unwrap();
        assert_ne!(staging.as_path(), input.path());
        assert!(name_of(&staging).starts_with(".stage_frame."));
        #[cfg(not(windows))]
        {
            let passed: Vec<String> = call.args[call.args.len() - 60..]
                .iter()
                .map(|a| a.to_string_lossy().into_owned())
                .collect();
            assert_eq!(passed[1], frame_file_name(2, "png"));
            assert_eq!(passed[9], frame_file_name(10, "png"));
        }
        assert!(!staging.exists());
    }

    #[test]
    fn test_same_output_gets_distinct_part_files() {
        let out = TempDir::new().unwrap();
        let input = TempDir::new().unwrap();
        let frames = loose_images(input.path(), 2);

        let gw = gateway(FakeBehavior::default());
        let output = out.path().join("a.gif");
        gw.synthesize_gif(&frames, &output, &EncodeSettings::default()).unwrap();
        gw.synthesize_gif(&frames, &output, &EncodeSettings::default()).unwrap();

        let parts: Vec<PathBuf> = gw
            .runner
            .gifski_calls()
            .iter()
            .map(|c| c.arg_after("-o").unwrap().to_path_buf())
            .collect();
        assert_eq!(parts.len(), 2);
        assert_ne!(parts[0], parts[1]);
        assert!(output.is_file());
        assert!(part_files(out.path()).is_empty());
    }

    #[test]
    fn test_failed_synthesis_leaves_no_output() {
        let out = TempDir::new().unwrap();
        let input = TempDir::new().unwrap();
        let frames = loose_images(input.path(), 2);

        let gw = gateway(FakeBehavior {
            fail_gifski_on: Some("walk_".to_string()),
            ..Default::default()
        });
        let output = out.path().join("walk.gif");
        let err = gw
            .synthesize_gif(&frames, &output, &EncodeSettings::default())
            .unwrap_err();

        match err {
            BulkGifError::GifSynthesisFailed {
                exit_code,
                stderr_tail,
            } => {
                assert_eq!(exit_code, Some(1));
                assert!(stderr_tail.contains("unable to decode"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!output.exists());
        assert!(part_files(out.path()).is_empty());
    }

    #[test]
    fn test_extract_frames() {
        let out = TempDir::new().unwrap();
        let video = out.path().join("clip.mp4");
        fs::write(&video, b"mp4").unwrap();
        let set = TempFrameSet::create(out.path().join("temp_clip"), false).unwrap();

        let gw = gateway(FakeBehavior {
            frames_per_video: 4,
            ..Default::default()
        });
        let frames = gw
            .extract_frames(&video, &set, &EncodeSettings::default())
            .unwrap();
        assert_eq!(frames.len(), 4);

        let call = &gw.runner.calls()[0];
        assert_eq!(call.arg_after("-i"), Some(video.as_path()));
        assert_eq!(call.arg_after("-vf"), Some(Path::new("fps=20")));
        assert_eq!(
            call.args.last().map(PathBuf::from),
            Some(set.path().join(FFMPEG_FRAME_TEMPLATE))
        );
    }

    #[test]
    fn test_extract_frames_failures() {
        let out = TempDir::new().unwrap();
        let video = out.path().join("broken.mp4");
        fs::write(&video, b"mp4").unwrap();
        let set = TempFrameSet::create(out.path().join("temp_broken"), false).unwrap();

        let gw = gateway(FakeBehavior {
            fail_ffmpeg: true,
            ..Default::default()
        });
        let err = gw
            .extract_frames(&video, &set, &EncodeSettings::default())
            .unwrap_err();
        assert!(matches!(
            err,
            BulkGifError::FrameExtractionFailed {
                exit_code: Some(1),
                ..
            }
        ));

        let gw = gateway(FakeBehavior {
            frames_per_video: 0,
            ..Default::default()
        });
        let err = gw
            .extract_frames(&video, &set, &EncodeSettings::default())
            .unwrap_err();
        assert!(err.to_string().contains("no frames were produced"));
    }

    #[test]
    fn test_optimize_reports_sizes_without_fps() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("mygif.gif");
        fs::write(&input, vec![0u8; 4096]).unwrap();

        let gw = gateway(FakeBehavior::default());
        let output = dir.path().join("mygif_optim_70q_20fps.gif");
        let (path, sizes) = gw
            .optimize_gif(&input, &output, &EncodeSettings::default())
            .unwrap();

        assert_eq!(path, output);
        assert_eq!(sizes.original, 4096);
        assert_eq!(sizes.new, fs::metadata(&output).unwrap().len());

        let call = &gw.runner.gifski_calls()[0];
        assert!(!call.has_arg("--fps"));
        assert_eq!(call.args.last().map(PathBuf::from), Some(input));
    }

    #[test]
    fn test_probe() {
        let gw = gateway(FakeBehavior::default());
        assert_eq!(gw.probe(Tool::Gifski).unwrap(), "gifski 1.32.0");
        assert!(gw.probe(Tool::Ffmpeg).unwrap().starts_with("ffmpeg version"));

        let gw = gateway(FakeBehavior {
            ffmpeg_installed: false,
            ..Default::default()
        });
        assert!(matches!(
            gw.probe(Tool::Ffmpeg),
            Err(BulkGifError::EncoderNotAvailable { .. })
        ));
    }

    #[test]
    fn test_version_check_timeout_reports_its_own_limit() {
        let gw = gateway(FakeBehavior {
            version_check_hangs: true,
            ..Default::default()
        });
        let err = gw.probe(Tool::Ffmpeg).unwrap_err().to_string();
        assert!(err.contains("timed out after 5s"), "{}", err);
    }
}
