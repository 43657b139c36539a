use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Files copied next to the binary so `load_config` and the CSV seeding find them
const RUNTIME_FILES: &[&str] = &["config.toml", "seed/sales_data.csv", "seed/customer_loyalty.csv"];

fn main() {
    for file in RUNTIME_FILES {
        println!("cargo:rerun-if-changed=../../{}", file);
    }

    let out_dir = env::var("OUT_DIR").unwrap();
    let profile = env::var("PROFILE").unwrap();

    // OUT_DIR is target/<profile>/build/<pkg>/out; the binary lives in target/<profile>
    let target_dir: PathBuf = Path::new(&out_dir)
        .ancestors()
        .find(|p| p.ends_with(&profile))
        .expect("Could not find target profile directory")
        .to_path_buf();

    let workspace_root = Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(|p| p.parent())
        .expect("Could not find workspace root");

    for file in RUNTIME_FILES {
        let source = workspace_root.join(file);
        let dest = target_dir.join(file);
        if !source.exists() {
            println!("cargo:warning={} not found at {:?}, skipping", file, source);
            continue;
        }
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .unwrap_or_else(|e| panic!("Failed to create {:?}: {}", parent, e));
        }
        fs::copy(&source, &dest).unwrap_or_else(|e| panic!("Failed to copy {}: {}", file, e));
    }
}
