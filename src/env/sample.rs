use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::paths::SAMPLE_ENV_FILE;

/// Write `.env.sample` next to the env file with every value blanked out
///
/// Returns the path of the written sample.
pub fn gen_sample_env(env_path: &Path) -> Result<PathBuf> {
    let content = fs::read_to_string(env_path)
        .with_context(|| format!("Failed to read env file: {}", env_path.display()))?;

    let sample_path = env_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(SAMPLE_ENV_FILE);

    let mut sample = String::new();
    for line in sample_lines(&content) {
        sample.push_str(&line);
        sample.push('\n');
    }

    fs::write(&sample_path, sample)
        .with_context(|| format!("Failed to write {}", sample_path.display()))?;

    println!("Wrote {}", sample_path.display());
    Ok(sample_path)
}

/// Blank out values, keeping comments and spacing lines as they are
pub fn sample_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(|line| {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                return line.to_string();
            }

            let key = line.split_once('=').map_or(line, |(key, _)| key);
            format!("{}=", key)
        })
        .collect()
}
