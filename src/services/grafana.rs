use anyhow::Result;

use crate::caddy;
use crate::provision::{CopyOptions, DIR_MODE};
use crate::registry::{Group, Registry, SetupContext};

pub(super) fn register(registry: &mut Registry) {
    registry
        .register(Group::Files, "grafana", setup)
        .register(Group::Caddy, "grafana", setup_caddy);
}

fn setup(ctx: &mut SetupContext, _service: &str) -> Result<()> {
    ctx.layout.mkdir("grafana/datasources", DIR_MODE)?;
    ctx.layout
        .copy("grafana/datasources/datasource.yml", &ctx.env, CopyOptions::default())?;
    Ok(())
}

fn setup_caddy(ctx: &mut SetupContext, service: &str) -> Result<()> {
    caddy::write_site(ctx, service, "GRAFANA_PORT")?;
    Ok(())
}
