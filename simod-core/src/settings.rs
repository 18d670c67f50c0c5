use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Run configuration. Constructed with `Default` and overridden field by
/// field from CLI flags.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Settings {
    /// Fixed size of the decompile worker pool.
    pub num_decompilers: usize,
    /// Time budget for a single external tool invocation.
    pub decompiler_timeout: Duration,
    /// Extension of compiled script files inside game packages.
    pub compiled_ext: String,
    /// Extension given to reconstructed source files.
    pub source_ext: String,
    /// Extensions treated as script package archives.
    pub archive_exts: Vec<String>,
    /// Directory holding engine binaries and scripts that are not on PATH.
    pub tools_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            num_decompilers: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4),
            decompiler_timeout: Duration::from_secs(120),
            compiled_ext: "pyc".to_string(),
            source_ext: "py".to_string(),
            archive_exts: vec!["zip".to_string(), "ts4script".to_string()],
            tools_dir: PathBuf::from("tools"),
        }
    }
}
