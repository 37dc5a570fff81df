//! Optional settings file
//!
//! Everything has a default, so a project without `homestack.yaml` behaves
//! exactly like one with an empty file. JSON is accepted as well.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::paths::{DATA_DIR, DEFAULT_OWNER_ID, ENV_FILE, TEMPLATES_DIR};
use crate::provision::Ownership;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub owner: OwnerSettings,
    pub data_dir: PathBuf,
    pub templates_dir: PathBuf,
    pub env_file: PathBuf,
    pub postgres: PostgresSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            owner: OwnerSettings::default(),
            data_dir: PathBuf::from(DATA_DIR),
            templates_dir: PathBuf::from(TEMPLATES_DIR),
            env_file: PathBuf::from(ENV_FILE),
            postgres: PostgresSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OwnerSettings {
    pub uid: u32,
    pub gid: u32,
}

impl Default for OwnerSettings {
    fn default() -> Self {
        Self {
            uid: DEFAULT_OWNER_ID,
            gid: DEFAULT_OWNER_ID,
        }
    }
}

impl From<OwnerSettings> for Ownership {
    fn from(owner: OwnerSettings) -> Self {
        Ownership::new(owner.uid, owner.gid)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PostgresSettings {
    /// Connect through the container network (POSTGRES_HOST/POSTGRES_PORT)
    /// instead of the port published on localhost
    pub in_docker: bool,
    /// psql client binary, looked up on PATH when not absolute
    pub psql: String,
}

impl Default for PostgresSettings {
    fn default() -> Self {
        Self {
            in_docker: false,
            psql: "psql".into(),
        }
    }
}

impl Settings {
    /// Load settings from `path`, or defaults when `path` does not exist
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No settings file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        Self::load(path)
    }

    /// Load settings from `path`, which must exist
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings: {}", path.display()))?;

        let settings = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => parse_json(&content),
            Some("yaml") | Some("yml") => parse_yaml(&content),
            _ => parse_auto(&content),
        };

        settings.with_context(|| format!("Invalid settings file: {}", path.display()))
    }

    /// Resolve the relative directories against the project root
    pub fn resolve(mut self, root: &Path) -> Self {
        self.data_dir = root.join(&self.data_dir);
        self.templates_dir = root.join(&self.templates_dir);
        self.env_file = root.join(&self.env_file);
        self
    }
}

fn parse_yaml(content: &str) -> Result<Settings> {
    if content.trim().is_empty() {
        return Ok(Settings::default());
    }
    serde_yaml::from_str(content).context("Failed to parse YAML settings")
}

fn parse_json(content: &str) -> Result<Settings> {
    serde_json::from_str(content).context("Failed to parse JSON settings")
}

fn parse_auto(content: &str) -> Result<Settings> {
    if content.trim_start().starts_with('{') {
        parse_json(content)
    } else {
        parse_yaml(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_conventional_layout() {
        let settings = Settings::default();
        assert_eq!(settings.owner.uid, 1000);
        assert_eq!(settings.owner.gid, 1000);
        assert_eq!(settings.data_dir, PathBuf::from("data"));
        assert_eq!(settings.templates_dir, PathBuf::from("templates"));
        assert_eq!(settings.env_file, PathBuf::from(".env"));
        assert!(!settings.postgres.in_docker);
        assert_eq!(settings.postgres.psql, "psql");
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let settings = parse_yaml("owner:\n  uid: 33\npostgres:\n  in_docker: true\n").unwrap();
        assert_eq!(settings.owner.uid, 33);
        assert_eq!(settings.owner.gid, 1000);
        assert!(settings.postgres.in_docker);
        assert_eq!(settings.postgres.psql, "psql");
    }

    #[test]
    fn empty_yaml_is_default() {
        assert_eq!(parse_yaml("\n").unwrap(), Settings::default());
    }

    #[test]
    fn auto_detects_json() {
        let settings = parse_auto(r#"{"data_dir": "/srv/data"}"#).unwrap();
        assert_eq!(settings.data_dir, PathBuf::from("/srv/data"));
    }

    #[test]
    fn resolve_joins_relative_paths_and_keeps_absolute_ones() {
        let settings = Settings {
            data_dir: PathBuf::from("/srv/data"),
            ..Settings::default()
        }
        .resolve(Path::new("/opt/stack"));

        assert_eq!(settings.data_dir, PathBuf::from("/srv/data"));
        assert_eq!(settings.templates_dir, PathBuf::from("/opt/stack/templates"));
        assert_eq!(settings.env_file, PathBuf::from("/opt/stack/.env"));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_or_default(&dir.path().join("homestack.yaml")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn load_requires_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::load(&dir.path().join("stack.yaml")).unwrap_err();
        assert!(format!("{:#}", err).contains("stack.yaml"));
    }

    #[test]
    fn invalid_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("homestack.yaml");
        fs::write(&path, "owner: [not, a, map]\n").unwrap();

        let err = Settings::load_or_default(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("homestack.yaml"));
    }
}
