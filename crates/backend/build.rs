use std::env;
use std::fs;
use std::path::Path;

/// Кладет config.toml из корня workspace рядом с бинарником
fn main() {
    println!("cargo:rerun-if-changed=../../config.toml");

    let (Ok(out_dir), Ok(profile)) = (env::var("OUT_DIR"), env::var("PROFILE")) else {
        println!("cargo:warning=OUT_DIR/PROFILE not set, config.toml not copied");
        return;
    };

    // OUT_DIR: target/<profile>/build/remnants_sync-xxx/out
    let Some(target_dir) = Path::new(&out_dir)
        .ancestors()
        .find(|p| p.ends_with(&profile))
        .map(Path::to_path_buf)
    else {
        println!("cargo:warning=target profile directory not found, config.toml not copied");
        return;
    };

    let Some(workspace_root) = Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(|p| p.parent())
    else {
        return;
    };

    let source_config = workspace_root.join("config.toml");
    if !source_config.exists() {
        println!("cargo:warning=config.toml not found, the embedded default will be used");
        return;
    }

    let dest_config = target_dir.join("config.toml");
    if let Err(e) = fs::copy(&source_config, &dest_config) {
        println!("cargo:warning=Failed to copy config.toml: {}", e);
    }
}
