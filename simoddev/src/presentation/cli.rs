use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "simod developer tooling", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Decompile the game's script packages into a source project folder
    Decompile {
        /// Folders holding the game's script package archives
        game_dirs: Vec<PathBuf>,

        /// Destination folder for reconstructed sources
        #[arg(long, default_value = "projects")]
        out: PathBuf,

        /// Worker pool size (defaults to the number of CPUs)
        #[arg(long)]
        jobs: Option<usize>,

        /// Per-invocation decompiler timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Directory holding engine binaries that are not on PATH
        #[arg(long)]
        tools_dir: Option<PathBuf>,
    },

    /// Package the mod source tree into a script archive
    Build {
        /// Mod source folder
        #[arg(long, default_value = "src")]
        src: PathBuf,

        /// Where the built archive goes
        #[arg(long, default_value = "build")]
        build_dir: PathBuf,

        /// The game's Mods folder
        #[arg(long)]
        mods_dir: PathBuf,

        /// Creator name, prefixed onto the mod name
        #[arg(long, default_value = "")]
        creator: String,

        /// Mod name
        #[arg(long, default_value = "Untitled")]
        name: String,
    },

    /// Mirror sources into the game for live iteration (Ctrl+C to stop)
    Devmode {
        /// Mod source folder
        #[arg(long, default_value = "src")]
        src: PathBuf,

        /// The game's Mods folder
        #[arg(long)]
        mods_dir: PathBuf,

        /// Creator name, prefixed onto the mod name
        #[arg(long, default_value = "")]
        creator: String,

        /// Mod name
        #[arg(long, default_value = "Untitled")]
        name: String,
    },

    /// Report which decompiler engines are available
    Check {
        /// Directory holding engine binaries that are not on PATH
        #[arg(long)]
        tools_dir: Option<PathBuf>,
    },
}
