use std::fs::{self, File};
use std::path::Path;

use tracing::debug;
use walkdir::WalkDir;
use zip::ZipArchive;

use crate::decompile::dispatch::decompile_dir;
use crate::decompile::engine::EngineSpec;
use crate::error::Result;
use crate::settings::Settings;
use crate::stats::{BatchStats, TotalStats};

/// Stages `archive` into a scratch directory, extracts it there, and runs a
/// decompile batch against the extracted tree. Output lands under
/// `dest_root/<archive stem>`. The archive is copied before extraction so a
/// partial unpack can never pollute the game folders.
pub fn decompile_archive(
    archive: &Path,
    dest_root: &Path,
    engines: &[EngineSpec],
    settings: &Settings,
    totals: &TotalStats,
) -> Result<BatchStats> {
    let name = archive
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("archive");
    let stem = archive
        .file_stem()
        .and_then(|n| n.to_str())
        .unwrap_or("archive");
    let dest_dir = dest_root.join(stem);

    let tmp = tempfile::tempdir()?;
    let staged = tmp.path().join(name);
    fs::copy(archive, &staged)?;

    let mut zip = ZipArchive::new(File::open(&staged)?)?;
    let extracted = tmp.path().join("extracted");
    zip.extract(&extracted)?;

    let stats = decompile_dir(&extracted, &dest_dir, name, engines, settings, totals)?;

    // Scratch removal is flaky on some platforms; a leaked temp dir is not
    // worth failing the run over.
    if let Err(e) = tmp.close() {
        debug!(error = %e, "scratch directory cleanup failed");
    }
    Ok(stats)
}

/// Walks `src_dir` for script package archives and decompiles each one into
/// its own subfolder of `dest_root`.
pub fn decompile_archives(
    src_dir: &Path,
    dest_root: &Path,
    engines: &[EngineSpec],
    settings: &Settings,
    totals: &TotalStats,
) -> Result<()> {
    println!("Decompiling {} to {}", src_dir.display(), dest_root.display());
    for entry in WalkDir::new(src_dir).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(ext) = entry.path().extension().and_then(|e| e.to_str()) else {
            continue;
        };
        if settings
            .archive_exts
            .iter()
            .any(|a| a.eq_ignore_ascii_case(ext))
        {
            decompile_archive(entry.path(), dest_root, engines, settings, totals)?;
        }
    }
    Ok(())
}
