//! # 外部进程执行
//!
//! `ProcessRunner` 抽象外部编码器调用，便于测试时替换为假实现。
//!
//! ## 功能
//! - stdin 置空，stdout 默认丢弃，stderr 由独立线程持续读取（防止管道写满死锁）
//! - 可选超时，超时后终止子进程
//! - Windows 下不弹出控制台窗口
//!
//! ## 依赖关系
//! - 被 `encoder/gateway.rs` 使用
//! - 使用 `tracing` 记录命令行

use crate::error::{BulkGifError, Result};

use std::ffi::OsString;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::debug;

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// 一次外部进程调用
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub current_dir: Option<PathBuf>,
    pub timeout: Option<Duration>,
    pub capture_stdout: bool,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Invocation {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
            timeout: None,
            capture_stdout: false,
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn capture_stdout(mut self) -> Self {
        self.capture_stdout = true;
        self
    }

    /// 程序名（用于错误信息）
    pub fn program_name(&self) -> String {
        self.program
            .file_name()
            .unwrap_or(self.program.as_os_str())
            .to_string_lossy()
            .into_owned()
    }

    /// 可读的命令行（仅用于日志）
    pub fn command_line(&self) -> String {
        let mut line = self.program.display().to_string();
        for arg in &self.args {
            line.push(' ');
            line.push_str(&arg.to_string_lossy());
        }
        line
    }

    /// 参数是否包含给定值
    #[cfg(test)]
    pub fn has_arg(&self, value: &str) -> bool {
        self.args.iter().any(|a| a == value)
    }

    /// 给定参数之后的值
    #[cfg(test)]
    pub fn arg_after(&self, flag: &str) -> Option<&std::path::Path> {
        let pos = self.args.iter().position(|a| a == flag)?;
        self.args.get(pos + 1).map(std::path::Path::new)
    }
}

/// 外部进程执行结果
#[derive(Debug, Clone, Default)]
pub struct ProcessOutput {
    /// 退出码（被信号终止时为 None）
    pub exit_code: Option<i32>,
    pub success: bool,
    /// 是否因超时被终止
    pub timed_out: bool,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    /// 成功退出
    #[cfg(test)]
    pub fn ok() -> Self {
        ProcessOutput {
            exit_code: Some(0),
            success: true,
            ..Default::default()
        }
    }

    /// 以给定退出码和 stderr 失败
    #[cfg(test)]
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        ProcessOutput {
            exit_code: Some(code),
            success: false,
            stderr: stderr.into(),
            ..Default::default()
        }
    }

    /// stderr 最后 `max_lines` 个非空行
    pub fn stderr_tail(&self, max_lines: usize) -> String {
        let lines: Vec<&str> = self
            .stderr
            .lines()
            .map(str::trim_end)
            .filter(|l| !l.is_empty())
            .collect();
        let start = lines.len().saturating_sub(max_lines);
        lines[start..].join("\n")
    }
}

/// 外部进程执行接口
pub trait ProcessRunner: Send + Sync {
    /// 执行进程并等待结束
    ///
    /// 仅在无法启动进程时返回错误；非零退出码体现在 `ProcessOutput` 中。
    fn run(&self, invocation: &Invocation) -> Result<ProcessOutput>;
}

/// 基于 `std::process::Command` 的实现
pub struct SystemRunner {
    poll_interval: Duration,
}

impl Default for SystemRunner {
    fn default() -> Self {
        SystemRunner {
            poll_interval: Duration::from_millis(50),
        }
    }
}

impl SystemRunner {
    pub fn new() -> Self {
        Self::default()
    }

    fn build_command(invocation: &Invocation) -> Command {
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args)
            .stdin(Stdio::null())
            .stderr(Stdio::piped());

        if invocation.capture_stdout {
            cmd.stdout(Stdio::piped());
        } else {
            cmd.stdout(Stdio::null());
        }

        if let Some(dir) = &invocation.current_dir {
            cmd.current_dir(dir);
        }

        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            cmd.creation_flags(CREATE_NO_WINDOW);
        }

        cmd
    }

    /// 等待子进程结束，超时则终止
    fn wait(&self, child: &mut Child, timeout: Option<Duration>) -> io::Result<(ExitStatus, bool)> {
        let limit = match timeout {
            Some(limit) => limit,
            None => return child.wait().map(|status| (status, false)),
        };

        let start = Instant::now();
        loop {
            if let Some(status) = child.try_wait()? {
                return Ok((status, false));
            }
            if start.elapsed() >= limit {
                // 进程可能恰好在此时退出，kill 失败可忽略
                let _ = child.kill();
                let status = child.wait()?;
                return Ok((status, true));
            }
            thread::sleep(self.poll_interval);
        }
    }
}

impl ProcessRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<ProcessOutput> {
        debug!(command = %invocation.command_line(), "Spawning external process");

        let mut child = Self::build_command(invocation).spawn().map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                BulkGifError::CommandNotFound {
                    command: invocation.program.display().to_string(),
                }
            } else {
                BulkGifError::Other(format!(
                    "Failed to start '{}': {}",
                    invocation.program.display(),
                    e
                ))
            }
        })?;

        let stderr_reader = child.stderr.take().map(drain);
        let stdout_reader = child.stdout.take().map(drain);

        let (status, timed_out) = self.wait(&mut child, invocation.timeout).map_err(|e| {
            BulkGifError::Other(format!(
                "Failed to wait for '{}': {}",
                invocation.program.display(),
                e
            ))
        })?;

        let stderr = stderr_reader.map(join_reader).unwrap_or_default();
        let stdout = stdout_reader.map(join_reader).unwrap_or_default();

        debug!(
            command = %invocation.program_name(),
            exit_code = ?status.code(),
            timed_out,
            "External process finished"
        );

        Ok(ProcessOutput {
            exit_code: status.code(),
            success: status.success() && !timed_out,
            timed_out,
            stdout,
            stderr,
        })
    }
}

/// 在独立线程中读完管道
fn drain<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    })
}

fn join_reader(handle: JoinHandle<String>) -> String {
    handle.join().unwrap_or_default()
}
