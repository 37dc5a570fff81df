//! Flat `KEY=VALUE` environment file handling
//!
//! The env file is the only input the setup callbacks share. It is loaded
//! once per run and then threaded mutably through every callback, so a
//! callback can publish derived values (password hashes and the like) for
//! the ones that follow it.

mod sample;

pub use sample::{gen_sample_env, sample_lines};

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnvError {
    #[error("variable {0} is not set in the env file")]
    Missing(String),
}

/// Variables loaded from the env file plus anything added during setup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Env {
    vars: HashMap<String, String>,
}

impl Env {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(|v| v.as_str())
    }

    /// Look up a variable a callback cannot work without
    pub fn require(&self, key: &str) -> Result<&str, EnvError> {
        self.get(key).ok_or_else(|| EnvError::Missing(key.to_string()))
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    #[cfg(test)]
    pub fn contains(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Env
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut env = Env::new();
        for (key, value) in iter {
            env.insert(key, value);
        }
        env
    }
}

/// Load an env file from disk
pub fn load(path: &Path) -> Result<Env> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read env file: {}", path.display()))?;
    Ok(parse(&content))
}

/// Parse env file content
///
/// Comment lines are skipped, the rest is split on the first `=` with both
/// sides trimmed. Lines without `=` carry no variable and are ignored.
pub fn parse(content: &str) -> Env {
    let mut env = Env::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some((key, value)) = line.split_once('=') {
            env.insert(key.trim(), value.trim());
        }
    }

    env
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_key_value_lines() {
        let env = parse("DOMAIN=example.org\nPOSTGRES_PORT = 5432\n");
        assert_eq!(env.get("DOMAIN"), Some("example.org"));
        assert_eq!(env.get("POSTGRES_PORT"), Some("5432"));
        assert_eq!(env.len(), 2);
    }

    #[test]
    fn skips_comments_and_blank_lines() {
        let env = parse("# database\n\n   # indented comment=1\nUSER=admin\n");
        assert_eq!(env.len(), 1);
        assert_eq!(env.get("USER"), Some("admin"));
    }

    #[test]
    fn splits_on_first_equals_only() {
        let env = parse("DSN=postgres://u:p@host/db?sslmode=disable\n");
        assert_eq!(
            env.get("DSN"),
            Some("postgres://u:p@host/db?sslmode=disable")
        );
    }

    #[test]
    fn ignores_lines_without_separator() {
        let env = parse("JUST_A_WORD\nKEY=value\n");
        assert!(!env.contains("JUST_A_WORD"));
        assert_eq!(env.len(), 1);
    }

    #[test]
    fn keeps_quotes_and_empty_values() {
        let env = parse("QUOTED=\"a b\"\nEMPTY=\n");
        assert_eq!(env.get("QUOTED"), Some("\"a b\""));
        assert_eq!(env.get("EMPTY"), Some(""));
    }

    #[test]
    fn later_duplicates_win() {
        let env = parse("PORT=1\nPORT=2\n");
        assert_eq!(env.get("PORT"), Some("2"));
    }

    #[test]
    fn require_reports_missing_key() {
        let env: Env = [("A", "1")].into_iter().collect();
        assert_eq!(env.require("A"), Ok("1"));
        assert_eq!(env.require("B"), Err(EnvError::Missing("B".into())));
    }

    #[test]
    fn load_fails_for_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(&dir.path().join(".env")).unwrap_err();
        assert!(err.to_string().contains("Failed to read env file"));
    }
}
