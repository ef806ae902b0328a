//! Debug-env command handler.
//!
//! Prints everything that decides where minecam reads its configuration
//! from, in `key = value` form.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::Result;
use minecam_core::paths::{
    PathError, check_env_file, config_dir, data_dir, exe_dir, lut_dir, project_root, run_mode,
    settings_file,
};
use minecam_core::default_env_candidates;
use minecam_runtime::ffmpeg::locate_ffmpeg;

fn show(key: &str, value: Result<PathBuf, PathError>) {
    match value {
        Ok(path) => println!("{key:<16} = {}", path.display()),
        Err(e) => println!("{key:<16} = <error: {e}>"),
    }
}

fn env_file_state(path: &Path) -> String {
    if !path.is_file() {
        return "missing".to_string();
    }
    match check_env_file(path) {
        Ok(()) => "valid".to_string(),
        Err(e) => format!("rejected ({e})"),
    }
}

/// Execute the debug-env command. `loaded` is the `.env` file loaded at
/// startup, if any.
pub fn execute(loaded: Option<&Path>) -> Result<()> {
    println!("{:<16} = {}", "run_mode", run_mode().describe());
    show(
        "executable",
        env::current_exe().map_err(|e| PathError::NoExecutable(e.to_string())),
    );
    show("exe_dir", exe_dir());
    println!("{:<16} = {}", "project_root", project_root().display());
    show("config_dir", config_dir());
    show("data_dir", data_dir());
    show("lut_dir", lut_dir());
    show("settings_file", settings_file());

    match locate_ffmpeg() {
        Ok(path) => println!("{:<16} = {}", "ffmpeg", path.display()),
        Err(e) => println!("{:<16} = <not found: {e}>", "ffmpeg"),
    }

    println!();
    println!(".env candidates:");
    for candidate in default_env_candidates() {
        println!("  {} ({})", candidate.display(), env_file_state(&candidate));
    }
    match loaded {
        Some(path) => println!("loaded .env      = {}", path.display()),
        None => println!("loaded .env      = <none, using process environment>"),
    }
    Ok(())
}
