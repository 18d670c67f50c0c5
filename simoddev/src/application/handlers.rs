use std::path::PathBuf;
use std::time::Duration;

use simod_core::decompile::engine::{EngineStatus, check_engines, default_chain};
use simod_core::error::Result;
use simod_core::stats::{TotalStats, print_summary};
use simod_core::{BundleOptions, Settings, bundle, decompile_archives};

const WATCH_INTERVAL: Duration = Duration::from_secs(1);

fn settings_from_args(
    jobs: Option<usize>,
    timeout: Option<u64>,
    tools_dir: Option<PathBuf>,
) -> Settings {
    let mut settings = Settings::default();
    if let Some(n) = jobs {
        settings.num_decompilers = n;
    }
    if let Some(secs) = timeout {
        settings.decompiler_timeout = Duration::from_secs(secs);
    }
    if let Some(dir) = tools_dir {
        settings.tools_dir = dir;
    }
    settings
}

fn print_engine_status(statuses: &[EngineStatus]) {
    for status in statuses {
        match (&status.pinned, status.optional) {
            (Some(path), _) => println!("{:<12} found at {}", status.name, path.display()),
            (None, true) => println!(
                "{:<12} missing (optional; enables rarer decompiles)",
                status.name
            ),
            (None, false) => println!("{:<12} expected on PATH", status.name),
        }
    }
}

pub fn handle_decompile(
    game_dirs: Vec<PathBuf>,
    out: PathBuf,
    jobs: Option<usize>,
    timeout: Option<u64>,
    tools_dir: Option<PathBuf>,
) -> Result<()> {
    let settings = settings_from_args(jobs, timeout, tools_dir);
    let engines = default_chain(&settings.tools_dir);
    std::fs::create_dir_all(&out)?;

    println!("Checking for decompilers...");
    print_engine_status(&check_engines(&engines, &settings.tools_dir));

    println!();
    println!("Beginning decompilation");
    println!("This may take a while! Some files may not decompile properly, which is normal.");
    println!();

    let totals = TotalStats::default();
    for dir in &game_dirs {
        decompile_archives(dir, &out, &engines, &settings, &totals)?;
    }

    println!("Results");
    let snap = totals.snapshot();
    print_summary(&snap);
    if snap.total > 0 {
        println!("{} minutes", totals.minutes());
    }
    println!();
    Ok(())
}

pub fn handle_build(
    src: PathBuf,
    build_dir: PathBuf,
    mods_dir: PathBuf,
    creator: String,
    name: String,
) -> Result<()> {
    let opts = BundleOptions {
        creator_name: creator,
        mod_name: name,
    };
    let built = bundle(&src, &build_dir, &mods_dir, &opts)?;
    println!("Built {}", built.display());
    Ok(())
}

pub fn handle_devmode(
    src: PathBuf,
    mods_dir: PathBuf,
    creator: String,
    name: String,
) -> Result<()> {
    let opts = BundleOptions {
        creator_name: creator,
        mod_name: name,
    };
    simod_core::devmode::watcher::watch(&src, &mods_dir, &opts.qualified_name(), WATCH_INTERVAL)
}

pub fn handle_check(tools_dir: Option<PathBuf>) -> Result<()> {
    let settings = settings_from_args(None, None, tools_dir);
    let engines = default_chain(&settings.tools_dir);
    print_engine_status(&check_engines(&engines, &settings.tools_dir));
    Ok(())
}
