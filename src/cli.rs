use anyhow::Result;
use clap::{CommandFactory, Parser};
use std::path::PathBuf;

use crate::db::Psql;
use crate::env::{self, gen_sample_env};
use crate::paths::SETTINGS_FILE;
use crate::provision::{Layout, Ownership};
use crate::registry::{Group, Registry, SetupContext};
use crate::services;
use crate::settings::Settings;

#[derive(Debug, Parser)]
#[command(name = "homestack")]
#[command(version)]
#[command(
    about = "Provision data directories, config files and databases for self-hosted services",
    long_about = None
)]
pub struct Cli {
    /// Project root holding .env, templates/ and data/
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Settings file (defaults to <root>/homestack.yaml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Env file to read instead of the configured one
    #[arg(long)]
    pub env_file: Option<PathBuf>,

    /// Reach postgres through the container network (POSTGRES_HOST/POSTGRES_PORT)
    #[arg(long)]
    pub in_docker: bool,

    /// Create directories and render config files for a service, or `all`
    #[arg(long, value_name = "SERVICE")]
    pub setup: Option<String>,

    /// Create the database role and database for a service, or `all`
    #[arg(long = "setup_db", visible_alias = "setup-db", value_name = "SERVICE")]
    pub setup_db: Option<String>,

    /// Write the Caddy site stanza for a service, or `all`
    #[arg(long = "setup_caddy", visible_alias = "setup-caddy", value_name = "SERVICE")]
    pub setup_caddy: Option<String>,

    /// Write .env.sample with every value blanked out
    #[arg(long = "gen_sample_env", visible_alias = "gen-sample-env")]
    pub gen_sample_env: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    fn requested(&self) -> impl Iterator<Item = (Group, &str)> {
        [
            (Group::Files, self.setup.as_deref()),
            (Group::Database, self.setup_db.as_deref()),
            (Group::Caddy, self.setup_caddy.as_deref()),
        ]
        .into_iter()
        .filter_map(|(group, name)| name.map(|n| (group, n)))
    }

    /// Reject unknown service names before anything is touched
    fn validate(&self, registry: &Registry) -> Result<()> {
        for (group, name) in self.requested() {
            registry.ensure_known(group, name)?;
        }
        Ok(())
    }

    fn settings(&self) -> Result<Settings> {
        // Only the implicit settings file may be absent
        let settings = match &self.config {
            Some(path) => Settings::load(path)?,
            None => Settings::load_or_default(&self.root.join(SETTINGS_FILE))?,
        };

        let mut settings = settings.resolve(&self.root);
        if let Some(env_file) = &self.env_file {
            settings.env_file = env_file.clone();
        }
        if self.in_docker {
            settings.postgres.in_docker = true;
        }
        Ok(settings)
    }
}

pub fn run(cli: Cli) -> Result<()> {
    if !cli.gen_sample_env && cli.requested().next().is_none() {
        Cli::command().print_help()?;
        return Ok(());
    }

    let registry = services::registry();
    cli.validate(&registry)?;

    let settings = cli.settings()?;
    tracing::debug!("Settings: {:?}", settings);

    let env = env::load(&settings.env_file)?;

    if cli.gen_sample_env {
        gen_sample_env(&settings.env_file)?;
    }

    let owner = Ownership::from(settings.owner);
    let mut ctx = SetupContext {
        env,
        layout: Layout::new(&settings.templates_dir, &settings.data_dir, owner),
        in_docker: settings.postgres.in_docker,
        sql: Box::new(Psql::new(settings.postgres.psql.clone())),
    };

    if cli.setup.is_some() || cli.setup_caddy.is_some() {
        check_privileges(owner);
    }

    for (group, name) in cli.requested() {
        registry.run(group, name, &mut ctx)?;
    }

    Ok(())
}

/// Changing ownership to another user needs root
fn check_privileges(owner: Ownership) {
    let is_root = nix::unistd::Uid::effective().is_root();
    if !needs_root_warning(owner, is_root, Ownership::current()) {
        return;
    }

    tracing::warn!(
        "Not running as root: files will be chowned to {}:{}, which will fail. \
         Run with sudo or set `owner` in {}",
        owner.uid,
        owner.gid,
        SETTINGS_FILE
    );
}

fn needs_root_warning(owner: Ownership, is_root: bool, current: Ownership) -> bool {
    !is_root && owner != current
}
