use std::env;
use std::fs;
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=config");
    copy_configs()
}

/// Copies config profiles next to the built binaries so `health-report`
/// finds them regardless of the working directory
fn copy_configs() -> Result<(), Box<dyn std::error::Error>> {
    let out_dir = env::var("OUT_DIR")?;

    // OUT_DIR is like: target/debug/build/system-health-xxx/out
    // We want: target/debug/config
    let target_dir = Path::new(&out_dir)
        .parent()
        .and_then(|p| p.parent())
        .and_then(|p| p.parent())
        .ok_or("Could not determine target directory")?;

    let source_dir = Path::new("config");
    if !source_dir.exists() {
        return Ok(());
    }

    let config_out_dir = target_dir.join("config");
    fs::create_dir_all(&config_out_dir)?;

    for entry in fs::read_dir(source_dir)? {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "toml")
            && let Some(name) = path.file_name()
        {
            fs::copy(&path, config_out_dir.join(name))?;
            println!("cargo:rerun-if-changed={}", path.display());
        }
    }

    Ok(())
}
