use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// How an engine hands back its reconstruction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputMode {
    /// The tool writes the output file itself, named by a flag (`-o path`).
    FileArg(String),
    /// The tool emits source text on stdout; the caller writes the file.
    StdoutCapture,
}

/// Capability record for one decompiler backend. The chain executor stays
/// engine-agnostic; every behavioral quirk lives here.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EngineSpec {
    pub name: String,
    /// Binary, script runner, or bare name left to PATH lookup.
    pub command: PathBuf,
    /// Fixed arguments placed before the output/input paths.
    pub args: Vec<String>,
    pub output: OutputMode,
    /// The tool errors out when its output file does not already exist.
    pub touch_output: bool,
    /// Skipped entirely (not counted as an attempt) when the binary is absent.
    pub optional: bool,
}

impl EngineSpec {
    /// Absolute command when it can be pinned to an existing file, first as
    /// given and then under the tools directory; otherwise the bare name is
    /// returned and PATH lookup happens at spawn time.
    pub fn resolved_command(&self, tools_dir: &Path) -> PathBuf {
        if self.command.is_file() {
            return self.command.clone();
        }
        let in_tools = tools_dir.join(&self.command);
        if in_tools.is_file() {
            in_tools
        } else {
            self.command.clone()
        }
    }

    /// Whether this engine should be attempted at all.
    pub fn available(&self, tools_dir: &Path) -> bool {
        if !self.optional {
            return true;
        }
        self.command.is_file() || tools_dir.join(&self.command).is_file()
    }

    /// Full argument vector for one attempt against `input`, writing to
    /// `output` when the engine takes an output flag.
    pub fn command_args(&self, input: &Path, output: &Path) -> Vec<OsString> {
        let mut argv: Vec<OsString> = self.args.iter().map(OsString::from).collect();
        if let OutputMode::FileArg(flag) = &self.output {
            argv.push(flag.into());
            argv.push(output.into());
        }
        argv.push(input.into());
        argv
    }
}

/// The fallback chain in empirical reliability order for the game's bytecode
/// dialect: fastest and most accurate engines first.
pub fn default_chain(tools_dir: &Path) -> Vec<EngineSpec> {
    vec![
        EngineSpec {
            name: "unpyc3".to_string(),
            command: PathBuf::from("python3"),
            args: vec![
                tools_dir
                    .join("unpyc37")
                    .join("unpyc3.py")
                    .to_string_lossy()
                    .into_owned(),
            ],
            output: OutputMode::StdoutCapture,
            touch_output: false,
            optional: false,
        },
        EngineSpec {
            name: "decompyle3".to_string(),
            command: PathBuf::from("decompyle3"),
            args: vec!["--verify".to_string(), "syntax".to_string()],
            output: OutputMode::FileArg("-o".to_string()),
            // decompyle3 errors when the output file doesn't already exist
            touch_output: true,
            optional: false,
        },
        EngineSpec {
            name: "pycdc".to_string(),
            command: tools_dir.join("pycdc").join("pycdc"),
            args: vec![],
            output: OutputMode::StdoutCapture,
            touch_output: false,
            optional: true,
        },
        EngineSpec {
            name: "uncompyle6".to_string(),
            command: PathBuf::from("uncompyle6"),
            args: vec![],
            output: OutputMode::FileArg("-o".to_string()),
            touch_output: false,
            optional: false,
        },
    ]
}

/// Availability report for one configured engine.
#[derive(Clone, Debug)]
pub struct EngineStatus {
    pub name: String,
    /// Set when the command resolves to a concrete file on disk.
    pub pinned: Option<PathBuf>,
    pub optional: bool,
}

/// Reports which engines resolve to something runnable. Missing optional
/// engines are worth surfacing: pycdc picks up files the others reject.
pub fn check_engines(engines: &[EngineSpec], tools_dir: &Path) -> Vec<EngineStatus> {
    engines
        .iter()
        .map(|e| {
            let resolved = e.resolved_command(tools_dir);
            let pinned = resolved.is_file().then_some(resolved);
            EngineStatus {
                name: e.name.clone(),
                pinned,
                optional: e.optional,
            }
        })
        .collect()
}
