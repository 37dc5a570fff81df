//! Filesystem side effects under the data directory
//!
//! Every operation here is safe to repeat: rendered files are never
//! overwritten once they exist, and directories are only created when
//! missing. Ownership is reapplied to directories on each run.

use anyhow::{Context, Result};
use nix::unistd::{self, Gid, Uid};
use std::fs::{self, DirBuilder};
use std::os::unix::fs::{DirBuilderExt, PermissionsExt};
use std::path::{Path, PathBuf};

use crate::env::Env;
use crate::template::safe_substitute;

/// Mode for created files unless a callback asks otherwise
pub const FILE_MODE: u32 = 0o644;

/// Mode for created directories unless a callback asks otherwise
pub const DIR_MODE: u32 = 0o755;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ownership {
    pub uid: u32,
    pub gid: u32,
}

impl Ownership {
    pub fn new(uid: u32, gid: u32) -> Self {
        Self { uid, gid }
    }

    /// Effective user and group of this process
    pub fn current() -> Self {
        Self {
            uid: unistd::geteuid().as_raw(),
            gid: unistd::getegid().as_raw(),
        }
    }

    fn apply(&self, path: &Path) -> Result<()> {
        unistd::chown(
            path,
            Some(Uid::from_raw(self.uid)),
            Some(Gid::from_raw(self.gid)),
        )
        .with_context(|| {
            format!(
                "Failed to chown {} to {}:{}",
                path.display(),
                self.uid,
                self.gid
            )
        })
    }
}

/// What a provisioning step did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Created,
    /// Destination already present, left untouched
    Exists,
    /// Existing file whose content was rewritten
    Updated,
    /// Source template missing, nothing done
    MissingSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyOptions {
    pub mode: u32,
    /// Substitute env variables; `false` copies the source verbatim
    pub template: bool,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            mode: FILE_MODE,
            template: true,
        }
    }
}

impl CopyOptions {
    pub fn raw() -> Self {
        Self {
            template: false,
            ..Self::default()
        }
    }
}

/// Source and destination roots plus the owner of everything created
#[derive(Debug, Clone)]
pub struct Layout {
    templates_dir: PathBuf,
    data_dir: PathBuf,
    owner: Ownership,
}

impl Layout {
    pub fn new(templates_dir: impl Into<PathBuf>, data_dir: impl Into<PathBuf>, owner: Ownership) -> Self {
        Self {
            templates_dir: templates_dir.into(),
            data_dir: data_dir.into(),
            owner,
        }
    }

    pub fn src(&self, file: impl AsRef<Path>) -> PathBuf {
        self.templates_dir.join(file)
    }

    pub fn dst(&self, file: impl AsRef<Path>) -> PathBuf {
        self.data_dir.join(file)
    }

    /// Render `templates/<file>` to `data/<file>` unless the destination exists
    pub fn copy(&self, file: impl AsRef<Path>, env: &Env, opts: CopyOptions) -> Result<Outcome> {
        let src = self.src(&file);
        let dst = self.dst(&file);

        if !src.exists() {
            tracing::error!("Template {} does not exist, skipping", src.display());
            return Ok(Outcome::MissingSource);
        }

        if dst.exists() {
            tracing::debug!("{} exists, leaving it untouched", dst.display());
            return Ok(Outcome::Exists);
        }

        let source = fs::read(&src).with_context(|| format!("Failed to read template: {}", src.display()))?;
        // Raw copies are byte-exact; only rendered templates must be text
        let content = if opts.template {
            let text = String::from_utf8(source)
                .with_context(|| format!("Template is not valid UTF-8: {}", src.display()))?;
            safe_substitute(&text, env).into_bytes()
        } else {
            source
        };

        self.ensure_parent(&dst)?;
        fs::write(&dst, content).with_context(|| format!("Failed to write {}", dst.display()))?;
        set_mode(&dst, opts.mode)?;
        self.owner.apply(&dst)?;

        tracing::debug!("Rendered {} -> {}", src.display(), dst.display());
        Ok(Outcome::Created)
    }

    /// Create `data/<file>` if missing; non-empty `data` replaces its content
    pub fn create_file(&self, file: impl AsRef<Path>, mode: u32, data: Option<&str>) -> Result<Outcome> {
        let dst = self.dst(file);
        let mut outcome = Outcome::Exists;

        if !dst.exists() {
            self.ensure_parent(&dst)?;
            fs::write(&dst, "").with_context(|| format!("Failed to create {}", dst.display()))?;
            set_mode(&dst, mode)?;
            self.owner.apply(&dst)?;
            tracing::debug!("Created {}", dst.display());
            outcome = Outcome::Created;
        }

        if let Some(data) = data.filter(|d| !d.is_empty()) {
            fs::write(&dst, data).with_context(|| format!("Failed to write {}", dst.display()))?;
            if outcome == Outcome::Exists {
                outcome = Outcome::Updated;
            }
        }

        Ok(outcome)
    }

    /// Create `data/<dir>` (and parents) with `mode` on the leaf
    pub fn mkdir(&self, dir: impl AsRef<Path>, mode: u32) -> Result<Outcome> {
        let dst = self.dst(dir);
        let outcome = if dst.is_dir() {
            Outcome::Exists
        } else {
            self.ensure_parent(&dst)?;
            DirBuilder::new()
                .mode(mode)
                .create(&dst)
                .with_context(|| format!("Failed to create directory {}", dst.display()))?;
            // DirBuilder honours the umask, the leaf must carry the exact mode
            set_mode(&dst, mode)?;
            tracing::debug!("Created directory {} ({:o})", dst.display(), mode);
            Outcome::Created
        };

        self.owner.apply(&dst)?;
        Ok(outcome)
    }

    fn ensure_parent(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory {}", parent.display()))?;
            }
        }
        Ok(())
    }
}

fn set_mode(path: &Path, mode: u32) -> Result<()> {
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
        .with_context(|| format!("Failed to set mode {:o} on {}", mode, path.display()))
}
