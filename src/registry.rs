//! Named groups of per-service setup callbacks
//!
//! Each group maps a service name to the callbacks registered for it, in
//! registration order. The special name `all` runs every callback of the
//! group in the order they were registered.

use anyhow::{bail, Context, Result};
use std::fmt;

use crate::db::{PostgresExecutor, SqlBackend, SqlError};
use crate::env::Env;
use crate::provision::Layout;

/// Entry that selects every service of a group
pub const ALL: &str = "all";

/// Everything a setup callback may touch
pub struct SetupContext {
    pub env: Env,
    pub layout: Layout,
    /// Reach postgres through the container network rather than localhost
    pub in_docker: bool,
    pub sql: Box<dyn SqlBackend>,
}

impl SetupContext {
    /// Executor connected as the postgres superuser from the env
    pub fn postgres(&self) -> Result<PostgresExecutor<'_>, SqlError> {
        PostgresExecutor::new(&self.env, self.in_docker, self.sql.as_ref())
    }
}

/// Callbacks receive the name of the service they were registered under
pub type SetupFn = fn(&mut SetupContext, &str) -> Result<()>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Group {
    /// Directories and config files
    Files,
    /// Roles and databases
    Database,
    /// Reverse proxy stanzas
    Caddy,
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flag = match self {
            Group::Files => "setup",
            Group::Database => "setup_db",
            Group::Caddy => "setup_caddy",
        };
        f.write_str(flag)
    }
}

#[derive(Clone, Copy)]
struct Step {
    service: &'static str,
    run: SetupFn,
}

#[derive(Default)]
struct Section {
    services: Vec<(&'static str, Vec<SetupFn>)>,
    all: Vec<Step>,
}

impl Section {
    fn register(&mut self, service: &'static str, run: SetupFn) {
        match self.services.iter_mut().find(|(name, _)| *name == service) {
            Some((_, callbacks)) => callbacks.push(run),
            None => self.services.push((service, vec![run])),
        }
        self.all.push(Step { service, run });
    }

    fn steps(&self, name: &str) -> Option<Vec<Step>> {
        if name == ALL {
            return Some(self.all.clone());
        }

        self.services
            .iter()
            .find(|(service, _)| *service == name)
            .map(|(service, callbacks)| {
                callbacks
                    .iter()
                    .map(|&run| Step {
                        service: *service,
                        run,
                    })
                    .collect()
            })
    }
}

#[derive(Default)]
pub struct Registry {
    files: Section,
    database: Section,
    caddy: Section,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    fn section(&self, group: Group) -> &Section {
        match group {
            Group::Files => &self.files,
            Group::Database => &self.database,
            Group::Caddy => &self.caddy,
        }
    }

    pub fn register(&mut self, group: Group, service: &'static str, run: SetupFn) -> &mut Self {
        let section = match group {
            Group::Files => &mut self.files,
            Group::Database => &mut self.database,
            Group::Caddy => &mut self.caddy,
        };
        section.register(service, run);
        self
    }

    /// Valid choices for a group, `all` first
    pub fn names(&self, group: Group) -> Vec<&'static str> {
        std::iter::once(ALL)
            .chain(self.section(group).services.iter().map(|(name, _)| *name))
            .collect()
    }

    pub fn contains(&self, group: Group, name: &str) -> bool {
        name == ALL || self.section(group).services.iter().any(|(n, _)| *n == name)
    }

    /// Fail with the valid choices when `name` is not registered in `group`
    pub fn ensure_known(&self, group: Group, name: &str) -> Result<()> {
        if !self.contains(group, name) {
            bail!(
                "Unknown service '{}' for --{}. Choose from: {}",
                name,
                group,
                self.names(group).join(", ")
            );
        }
        Ok(())
    }

    /// Run every callback registered for `name` in `group`
    pub fn run(&self, group: Group, name: &str, ctx: &mut SetupContext) -> Result<()> {
        self.ensure_known(group, name)?;
        let steps = self.section(group).steps(name).unwrap_or_default();

        for step in steps {
            println!("Setup {}", step.service);
            (step.run)(ctx, step.service)
                .with_context(|| format!("--{} {} failed", group, step.service))?;
            println!("Complete {}", step.service);
        }

        Ok(())
    }
}
