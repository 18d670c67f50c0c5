use std::ffi::OsString;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use tracing::warn;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Outcome of one external tool invocation.
#[derive(Debug)]
pub enum ToolResult {
    /// The process ran to completion within its time budget.
    Completed {
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
    },
    /// Killed after exceeding the time budget.
    TimedOut,
    /// The process could not be launched at all.
    LaunchFailed(String),
}

impl ToolResult {
    /// Clean exit: status zero and nothing on stderr. Decompilers routinely
    /// emit warnings on stderr alongside broken output, so anything there
    /// counts as failure; a false negative only costs a fallback attempt.
    pub fn succeeded(&self) -> bool {
        matches!(
            self,
            ToolResult::Completed { exit_code: Some(0), stderr, .. } if stderr.is_empty()
        )
    }

    pub fn stdout(&self) -> Option<&str> {
        match self {
            ToolResult::Completed { stdout, .. } => Some(stdout.as_str()),
            _ => None,
        }
    }

    /// Text worth keeping for an aggregated failure report.
    pub fn diagnostics(&self) -> String {
        match self {
            ToolResult::Completed {
                exit_code, stderr, ..
            } => {
                if stderr.is_empty() {
                    format!("exit code {exit_code:?}")
                } else {
                    stderr.clone()
                }
            }
            ToolResult::TimedOut => "timed out".to_string(),
            ToolResult::LaunchFailed(e) => e.clone(),
        }
    }
}

/// Runs an external tool with stdout/stderr captured, killing it once
/// `timeout` elapses. Launch errors and timeouts come back as variants;
/// nothing in here propagates.
///
/// Output goes through unlinked temp files rather than pipes so a chatty
/// tool can never deadlock against a full pipe while we poll it.
pub fn run_tool(program: &Path, args: &[OsString], timeout: Duration) -> ToolResult {
    let mut out_file = match tempfile::tempfile() {
        Ok(f) => f,
        Err(e) => return ToolResult::LaunchFailed(format!("stdout capture: {e}")),
    };
    let mut err_file = match tempfile::tempfile() {
        Ok(f) => f,
        Err(e) => return ToolResult::LaunchFailed(format!("stderr capture: {e}")),
    };
    let (out_sink, err_sink) = match (out_file.try_clone(), err_file.try_clone()) {
        (Ok(o), Ok(e)) => (o, e),
        _ => return ToolResult::LaunchFailed("capture handle clone failed".to_string()),
    };

    let mut child = match Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::from(out_sink))
        .stderr(Stdio::from(err_sink))
        .spawn()
    {
        Ok(c) => c,
        Err(e) => {
            warn!(program = %program.display(), args = ?args, error = %e, "failed to launch tool");
            return ToolResult::LaunchFailed(e.to_string());
        }
    };

    let started = Instant::now();
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                if started.elapsed() >= timeout {
                    let _ = child.kill();
                    let _ = child.wait();
                    return ToolResult::TimedOut;
                }
                std::thread::sleep(POLL_INTERVAL);
            }
            Err(e) => {
                warn!(program = %program.display(), error = %e, "wait on tool failed");
                let _ = child.kill();
                let _ = child.wait();
                return ToolResult::LaunchFailed(e.to_string());
            }
        }
    };

    ToolResult::Completed {
        exit_code: status.code(),
        stdout: read_back(&mut out_file),
        stderr: read_back(&mut err_file),
    }
}

fn read_back(f: &mut File) -> String {
    let mut buf = String::new();
    if f.seek(SeekFrom::Start(0)).is_ok() {
        let _ = f.read_to_string(&mut buf);
    }
    buf
}
