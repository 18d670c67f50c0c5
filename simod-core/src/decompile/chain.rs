use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::decompile::engine::{EngineSpec, OutputMode};
use crate::exec::{ToolResult, run_tool};

/// One compiled-file-to-source reconstruction job.
#[derive(Clone, Debug)]
pub struct DecompileTask {
    /// Compiled bytecode file, present at dispatch time.
    pub source: PathBuf,
    /// Where the reconstructed source should end up.
    pub dest: PathBuf,
}

/// Tries each engine in priority order until one cleanly succeeds; on total
/// failure keeps the attempt that produced the most lines. Returns whether
/// the task counts as a success.
///
/// Nothing propagates out of here: every failure mode at this level is one
/// task's problem, never the batch's.
pub fn run_chain(
    task: &DecompileTask,
    engines: &[EngineSpec],
    tools_dir: &Path,
    timeout: Duration,
) -> bool {
    // Slot 0 is the real destination; the rest are scratch files in the same
    // directory, uniquely named so sibling tasks can never collide. Holding
    // the NamedTempFile guards means every scratch file is removed when this
    // function exits, by whatever path.
    let (slots, _guards) = match make_slots(&task.dest, engines.len().max(1)) {
        Ok(v) => v,
        Err(e) => {
            warn!(dest = %task.dest.display(), error = %e, "could not create scratch outputs");
            return false;
        }
    };

    let mut line_counts = vec![0usize; slots.len()];
    let mut diagnostics = String::new();
    let mut succeeded = false;
    let mut winner = 0usize;

    for (slot, engine) in engines.iter().enumerate() {
        if !engine.available(tools_dir) {
            continue;
        }
        let out_path = &slots[slot];
        if engine.touch_output {
            if let Err(e) = File::create(out_path) {
                warn!(engine = %engine.name, path = %out_path.display(), error = %e,
                    "could not pre-create output file");
                continue;
            }
        }

        let program = engine.resolved_command(tools_dir);
        let args = engine.command_args(&task.source, out_path);
        let result = run_tool(&program, &args, timeout);

        let mut ok = result.succeeded();
        if engine.output == OutputMode::StdoutCapture {
            if let Some(text) = result.stdout().filter(|t| !t.is_empty()) {
                if let Err(e) = fs::write(out_path, text) {
                    warn!(program = %program.display(), args = ?args, error = %e,
                        "writing captured output failed");
                    ok = false;
                }
            }
        }
        line_counts[slot] = count_lines(out_path);

        if ok {
            succeeded = true;
            winner = slot;
            break;
        }
        let report = result.diagnostics();
        if !report.is_empty() {
            let _ = writeln!(diagnostics, "[{}] {}", engine.name, report.trim_end());
        }
    }

    if !succeeded {
        if !diagnostics.is_empty() {
            debug!(source = %task.source.display(), "all engines failed:\n{diagnostics}");
        }
        winner = best_slot(&line_counts);
    }

    // Promote the winning candidate into the real destination.
    if winner != 0 && slots[winner].is_file() {
        if let Err(e) = fs::copy(&slots[winner], &slots[0]) {
            warn!(dest = %task.dest.display(), error = %e, "could not keep best candidate");
        }
    }

    // A task where no attempt produced any output leaves no file behind.
    if !succeeded && line_counts[winner] == 0 {
        let _ = fs::remove_file(&slots[0]);
    }

    succeeded
}

fn make_slots(dest: &Path, count: usize) -> std::io::Result<(Vec<PathBuf>, Vec<NamedTempFile>)> {
    let dir = dest.parent().filter(|p| !p.as_os_str().is_empty());
    let dir = dir.unwrap_or_else(|| Path::new("."));
    let prefix = dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut slots = vec![dest.to_path_buf()];
    let mut guards = Vec::with_capacity(count.saturating_sub(1));
    for _ in 1..count {
        let tmp = tempfile::Builder::new().prefix(&prefix).tempfile_in(dir)?;
        slots.push(tmp.path().to_path_buf());
        guards.push(tmp);
    }
    Ok((slots, guards))
}

/// Index of the best salvage candidate: strictly greatest line count, ties
/// to the lowest slot. Raw line count is a blunt proxy for completeness and
/// can be fooled by verbose garbage; kept deliberately simple.
fn best_slot(line_counts: &[usize]) -> usize {
    let mut best = 0;
    for (i, &n) in line_counts.iter().enumerate() {
        if n > line_counts[best] {
            best = i;
        }
    }
    best
}

/// Line count of a candidate file; a final unterminated line counts too.
/// Missing or unreadable files count as zero.
fn count_lines(path: &Path) -> usize {
    let Ok(file) = File::open(path) else { return 0 };
    let mut reader = BufReader::new(file);
    let mut buf = [0u8; 8192];
    let mut lines = 0usize;
    let mut last = b'\n';
    loop {
        match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => {
                lines += buf[..n].iter().filter(|&&b| b == b'\n').count();
                last = buf[n - 1];
            }
            Err(_) => break,
        }
    }
    if last != b'\n' {
        lines += 1;
    }
    lines
}
