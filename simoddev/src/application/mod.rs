pub mod handlers;

use crate::presentation::cli::{Cli, Commands};
use clap::Parser;
use simod_core::error::Result;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Decompile {
            game_dirs,
            out,
            jobs,
            timeout,
            tools_dir,
        } => handlers::handle_decompile(game_dirs, out, jobs, timeout, tools_dir),
        Commands::Build {
            src,
            build_dir,
            mods_dir,
            creator,
            name,
        } => handlers::handle_build(src, build_dir, mods_dir, creator, name),
        Commands::Devmode {
            src,
            mods_dir,
            creator,
            name,
        } => handlers::handle_devmode(src, mods_dir, creator, name),
        Commands::Check { tools_dir } => handlers::handle_check(tools_dir),
    }
}
