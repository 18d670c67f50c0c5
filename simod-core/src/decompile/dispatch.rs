use std::fs;
use std::path::Path;
use std::time::Instant;

use rayon::prelude::*;
use walkdir::WalkDir;

use crate::decompile::chain::{DecompileTask, run_chain};
use crate::decompile::engine::EngineSpec;
use crate::error::{Result, SimodError};
use crate::settings::Settings;
use crate::stats::{BatchStats, TotalStats, print_summary};

/// Decompiles every compiled script under `src_dir` into the mirrored
/// relative path under `dest_dir`, fanning tasks across a fixed-size worker
/// pool. Blocks until the pool drains; individual task failures only show up
/// in the counters. `label` names the batch in progress output.
pub fn decompile_dir(
    src_dir: &Path,
    dest_dir: &Path,
    label: &str,
    engines: &[EngineSpec],
    settings: &Settings,
    totals: &TotalStats,
) -> Result<BatchStats> {
    let started = Instant::now();
    println!("Decompiling {label}");

    let mut tasks = Vec::new();
    for entry in WalkDir::new(src_dir).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some(settings.compiled_ext.as_str()) {
            continue;
        }
        let rel = path.strip_prefix(src_dir).unwrap_or(path);
        let dest = dest_dir.join(rel).with_extension(&settings.source_ext);

        // Destination directories are created up front so sibling workers
        // never race on mkdir. If this fails, no task in the subtree can
        // succeed, so it escalates instead of being swallowed.
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        tasks.push(DecompileTask {
            source: path.to_path_buf(),
            dest,
        });
    }

    let stats = BatchStats::default();
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(settings.num_decompilers.max(1))
        .build()
        .map_err(|e| SimodError::Pool(e.to_string()))?;

    pool.install(|| {
        tasks.par_iter().for_each(|task| {
            let ok = run_chain(task, engines, &settings.tools_dir, settings.decompiler_timeout);
            stats.record(totals, ok);
        });
    });

    let elapsed = started.elapsed();
    totals.add_minutes((elapsed.as_secs_f64() / 60.0).round() as u32);

    println!();
    println!();
    println!("Completed");
    print_summary(&stats.snapshot());
    println!("{:.2} minutes", elapsed.as_secs_f64() / 60.0);
    println!();

    Ok(stats)
}
