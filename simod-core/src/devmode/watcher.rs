use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use time::OffsetDateTime;
use time::macros::format_description;
use tracing::warn;
use walkdir::WalkDir;

use crate::error::Result;

/// `Mods/<mod>/Scripts`, the live-reload mirror target.
pub fn scripts_path(mods_dir: &Path, mod_name: &str) -> PathBuf {
    mods_dir.join(mod_name).join("Scripts")
}

pub fn scripts_folder_exists(mods_dir: &Path, mod_name: &str) -> bool {
    scripts_path(mods_dir, mod_name).exists()
}

/// Best-effort removal; a stuck Scripts folder is reported, not fatal.
pub fn remove_scripts_folder(mods_dir: &Path, mod_name: &str) {
    let path = scripts_path(mods_dir, mod_name);
    if !path.exists() {
        return;
    }
    let outcome = if path.is_dir() {
        fs::remove_dir_all(&path)
    } else {
        fs::remove_file(&path)
    };
    if let Err(e) = outcome {
        warn!(path = %path.display(), error = %e, "could not remove Scripts folder");
    }
}

/// One mirror pass: copies every file that is missing from the mirror or
/// newer than its mirrored copy. Returns the source files that were
/// refreshed.
pub fn sync_tree(src_dir: &Path, dest_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut updated = Vec::new();
    for entry in WalkDir::new(src_dir).into_iter().filter_map(|e| e.ok()) {
        let rel = entry.path().strip_prefix(src_dir).unwrap_or(entry.path());
        let dest = dest_dir.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest)?;
            continue;
        }
        if !entry.file_type().is_file() {
            continue;
        }
        if needs_copy(entry.path(), &dest) {
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &dest)?;
            updated.push(entry.path().to_path_buf());
        }
    }
    Ok(updated)
}

fn needs_copy(src: &Path, dest: &Path) -> bool {
    let Ok(dest_meta) = dest.metadata() else {
        return true;
    };
    let src_time = src.metadata().and_then(|m| m.modified());
    let dest_time = dest_meta.modified();
    match (src_time, dest_time) {
        (Ok(s), Ok(d)) => s > d,
        // When timestamps can't be read, copying again is the safe answer.
        _ => true,
    }
}

/// Mirrors the source tree into the mod's Scripts folder and keeps it fresh,
/// re-scanning on every tick until the process is interrupted.
pub fn watch(src_dir: &Path, mods_dir: &Path, mod_name: &str, interval: Duration) -> Result<()> {
    let scripts = scripts_path(mods_dir, mod_name);
    remove_scripts_folder(mods_dir, mod_name);
    fs::create_dir_all(&scripts)?;

    println!();
    println!(
        "Dev Mode is active: changes under {} are mirrored into the game automatically.",
        src_dir.display()
    );
    println!("Run the build command to exit Dev Mode and return to packaged scripts.");
    println!();

    sync_tree(src_dir, &scripts)?;
    let ts_format = format_description!("[hour]:[minute]:[second]");
    loop {
        std::thread::sleep(interval);
        match sync_tree(src_dir, &scripts) {
            Ok(updated) => {
                for path in updated {
                    let now = OffsetDateTime::now_utc()
                        .format(&ts_format)
                        .unwrap_or_default();
                    println!("[{now}] Updated file: {}", path.display());
                }
            }
            Err(e) => warn!(error = %e, "mirror pass failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_pass_copies_everything() {
        let src = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        fs::write(src.path().join("mod.py"), "print()\n").unwrap();
        fs::create_dir_all(src.path().join("sub")).unwrap();
        fs::write(src.path().join("sub").join("util.py"), "x = 1\n").unwrap();

        let updated = sync_tree(src.path(), dest.path()).unwrap();
        assert_eq!(updated.len(), 2);
        assert_eq!(
            fs::read_to_string(dest.path().join("sub").join("util.py")).unwrap(),
            "x = 1\n"
        );
    }

    #[test]
    fn unchanged_trees_are_not_recopied() {
        let src = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        fs::write(src.path().join("mod.py"), "print()\n").unwrap();

        sync_tree(src.path(), dest.path()).unwrap();
        let second = sync_tree(src.path(), dest.path()).unwrap();
        assert!(second.is_empty());
    }

    #[test]
    fn missing_mirror_files_are_restored() {
        let src = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        fs::write(src.path().join("mod.py"), "print()\n").unwrap();

        sync_tree(src.path(), dest.path()).unwrap();
        fs::remove_file(dest.path().join("mod.py")).unwrap();
        let restored = sync_tree(src.path(), dest.path()).unwrap();
        assert_eq!(restored, vec![src.path().join("mod.py")]);
    }

    #[test]
    fn scripts_folder_removal_tolerates_absence() {
        let mods = tempfile::tempdir().unwrap();
        remove_scripts_folder(mods.path(), "Nobody_Nothing");

        let scripts = scripts_path(mods.path(), "Me_Mod");
        fs::create_dir_all(&scripts).unwrap();
        assert!(scripts_folder_exists(mods.path(), "Me_Mod"));
        remove_scripts_folder(mods.path(), "Me_Mod");
        assert!(!scripts_folder_exists(mods.path(), "Me_Mod"));
    }
}
