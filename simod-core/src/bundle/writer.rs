use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::devmode::watcher;
use crate::error::Result;

const SCRIPT_ARCHIVE_EXT: &str = "ts4script";

#[derive(Clone, Debug)]
pub struct BundleOptions {
    pub creator_name: String,
    pub mod_name: String,
}

impl BundleOptions {
    /// Folder and archive base name, `<creator>_<mod>` when a creator is set.
    pub fn qualified_name(&self) -> String {
        if self.creator_name.is_empty() {
            self.mod_name.clone()
        } else {
            format!("{}_{}", self.creator_name, self.mod_name)
        }
    }
}

/// Packages the mod source tree into a fresh script archive under
/// `build_dir` and drops a copy into the game's mods folder. Stale builds
/// and any leftover devmode Scripts folder are cleared first.
pub fn bundle(
    src_dir: &Path,
    build_dir: &Path,
    mods_dir: &Path,
    opts: &BundleOptions,
) -> Result<PathBuf> {
    let mod_name = opts.qualified_name();
    let mods_sub_dir = mods_dir.join(&mod_name);
    let build_path = build_dir.join(format!("{mod_name}.{SCRIPT_ARCHIVE_EXT}"));
    let mod_path = mods_sub_dir.join(format!("{mod_name}.{SCRIPT_ARCHIVE_EXT}"));

    println!("Clearing out old builds...");
    if watcher::scripts_folder_exists(mods_dir, &mod_name) {
        println!("Exiting Dev Mode...");
    }
    watcher::remove_scripts_folder(mods_dir, &mod_name);

    if mods_sub_dir.is_dir() {
        for entry in WalkDir::new(&mods_sub_dir).into_iter().filter_map(|e| e.ok()) {
            if entry.file_type().is_file()
                && entry.path().extension().and_then(|e| e.to_str()) == Some(SCRIPT_ARCHIVE_EXT)
            {
                let _ = fs::remove_file(entry.path());
            }
        }
    }
    if build_dir.exists() {
        fs::remove_dir_all(build_dir)?;
    }
    fs::create_dir_all(build_dir)?;
    fs::create_dir_all(&mods_sub_dir)?;

    println!("Re-building mod...");
    write_archive(src_dir, &build_path)?;
    fs::copy(&build_path, &mod_path)?;

    println!("Made .{SCRIPT_ARCHIVE_EXT} in the build and mod folders");
    Ok(build_path)
}

fn write_archive(src_dir: &Path, out: &Path) -> Result<()> {
    let mut zf = ZipWriter::new(File::create(out)?);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut buf = Vec::new();

    for entry in WalkDir::new(src_dir).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry.path().strip_prefix(src_dir).unwrap_or(entry.path());
        zf.start_file(rel.to_string_lossy().replace('\\', "/"), options)?;
        buf.clear();
        File::open(entry.path())?.read_to_end(&mut buf)?;
        zf.write_all(&buf)?;
    }
    zf.finish()?;
    Ok(())
}
