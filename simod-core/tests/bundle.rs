use std::fs::{self, File};
use std::io::Read;

use simod_core::devmode::watcher;
use simod_core::{BundleOptions, bundle};
use zip::ZipArchive;

fn opts() -> BundleOptions {
    BundleOptions {
        creator_name: "Creator".to_string(),
        mod_name: "Sample".to_string(),
    }
}

#[test]
fn qualified_name_prefixes_the_creator() {
    assert_eq!(opts().qualified_name(), "Creator_Sample");
    let anonymous = BundleOptions {
        creator_name: String::new(),
        mod_name: "Sample".to_string(),
    };
    assert_eq!(anonymous.qualified_name(), "Sample");
}

#[test]
fn bundle_archives_the_source_tree_and_installs_a_copy() {
    let work = tempfile::tempdir().unwrap();
    let src = work.path().join("src");
    fs::create_dir_all(src.join("sub")).unwrap();
    fs::write(src.join("mod.py"), "print('hi')\n").unwrap();
    fs::write(src.join("sub").join("helper.py"), "x = 1\n").unwrap();

    let build_dir = work.path().join("build");
    let mods_dir = work.path().join("Mods");
    fs::create_dir_all(&mods_dir).unwrap();

    let built = bundle(&src, &build_dir, &mods_dir, &opts()).unwrap();
    assert_eq!(built, build_dir.join("Creator_Sample.ts4script"));

    let mut zf = ZipArchive::new(File::open(&built).unwrap()).unwrap();
    let names: Vec<_> = (0..zf.len())
        .map(|i| zf.by_index(i).unwrap().name().to_string())
        .collect();
    assert!(names.contains(&"mod.py".to_string()));
    assert!(names.contains(&"sub/helper.py".to_string()));

    let mut content = String::new();
    zf.by_name("mod.py")
        .unwrap()
        .read_to_string(&mut content)
        .unwrap();
    assert_eq!(content, "print('hi')\n");

    let installed = mods_dir
        .join("Creator_Sample")
        .join("Creator_Sample.ts4script");
    assert_eq!(
        fs::read(&built).unwrap(),
        fs::read(&installed).unwrap(),
        "the installed copy must match the build output"
    );
}

#[test]
fn bundle_clears_devmode_and_stale_builds() {
    let work = tempfile::tempdir().unwrap();
    let src = work.path().join("src");
    fs::create_dir_all(&src).unwrap();
    fs::write(src.join("mod.py"), "pass\n").unwrap();

    let build_dir = work.path().join("build");
    let mods_dir = work.path().join("Mods");

    // Leftover devmode mirror and a stale archive from a previous build.
    let scripts = watcher::scripts_path(&mods_dir, "Creator_Sample");
    fs::create_dir_all(&scripts).unwrap();
    fs::write(scripts.join("old.py"), "stale\n").unwrap();
    let mod_dir = mods_dir.join("Creator_Sample");
    fs::write(mod_dir.join("old.ts4script"), b"stale").unwrap();
    fs::create_dir_all(&build_dir).unwrap();
    fs::write(build_dir.join("junk.ts4script"), b"stale").unwrap();

    bundle(&src, &build_dir, &mods_dir, &opts()).unwrap();

    assert!(!scripts.exists(), "devmode Scripts folder must be removed");
    assert!(!mod_dir.join("old.ts4script").exists());
    assert!(!build_dir.join("junk.ts4script").exists());
    assert!(build_dir.join("Creator_Sample.ts4script").is_file());
}
