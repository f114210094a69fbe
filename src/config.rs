use std::env;
use std::fs;
use std::num::NonZeroUsize;
use std::path::PathBuf;

use cross_xdg::BaseDirs;
use tracing::{debug, warn};

use crate::limits::Limits;
use crate::prompt::parse_count;

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "BF_CONFIG";
pub const MAX_STEPS_ENV: &str = "BF_MAX_STEPS";
pub const MEMORY_SIZE_ENV: &str = "BF_MEMORY_SIZE";

/// Limits taken from the `[limits]` section of the config file.
pub fn load_file_limits() -> Limits {
    let Some(path) = config_path() else {
        return Limits::default();
    };
    match fs::read_to_string(&path) {
        Ok(content) => {
            debug!(path = %path.display(), "loaded config");
            parse_limits(&content)
        }
        Err(_) => Limits::default(),
    }
}

/// Limits taken from `BF_MAX_STEPS` / `BF_MEMORY_SIZE`.
pub fn env_limits() -> Limits {
    let step_limit = env::var(MAX_STEPS_ENV).ok().and_then(|s| {
        let parsed = parse_count(s.trim());
        if parsed.is_none() {
            warn!(value = %s, "ignoring invalid {MAX_STEPS_ENV}");
        }
        parsed
    });
    let memory_size = env::var(MEMORY_SIZE_ENV).ok().and_then(|s| {
        let parsed = parse_count(s.trim()).and_then(NonZeroUsize::new);
        if parsed.is_none() {
            warn!(value = %s, "ignoring invalid {MEMORY_SIZE_ENV}");
        }
        parsed
    });
    Limits::new(step_limit, memory_size)
}

fn config_path() -> Option<PathBuf> {
    if let Ok(explicit) = env::var(CONFIG_PATH_ENV) {
        return Some(PathBuf::from(explicit));
    }

    // On Linux: resolves to /home/<user>/.config
    // On Windows: resolves to C:\Users\<user>\.config
    // On macOS: resolves to /Users/<user>/.config
    let base_dirs = BaseDirs::new().ok()?;
    let mut path = PathBuf::from(base_dirs.config_home());
    path.push("bf.toml");
    Some(path)
}

/// Very small hand-rolled parser: looks for a `[limits]` section and
/// `key = value` pairs. Values may be quoted.
pub fn parse_limits(content: &str) -> Limits {
    let mut in_limits = false;
    let mut limits = Limits::default();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') { continue; }
        if line.starts_with('[') && line.ends_with(']') {
            in_limits = &line[1..line.len()-1] == "limits";
            continue;
        }
        if !in_limits { continue; }
        let Some((key, val_raw)) = line.split_once('=') else { continue; };
        let key = key.trim();
        let val_raw = val_raw.trim();
        let val = if val_raw.starts_with('"') && val_raw.ends_with('"') && val_raw.len() >= 2 {
            &val_raw[1..val_raw.len()-1]
        } else {
            val_raw
        };

        match key {
            "max_steps" => match parse_count(val) {
                Some(n) => limits.step_limit = Some(n),
                None => warn!(key, value = val, "ignoring invalid config value"),
            },
            "memory_size" => match parse_count(val).and_then(NonZeroUsize::new) {
                Some(n) => limits.memory_size = Some(n),
                None => warn!(key, value = val, "ignoring invalid config value"),
            },
            _ => {}
        }
    }

    limits
}
