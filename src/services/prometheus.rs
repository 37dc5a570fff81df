use anyhow::Result;

use super::operator_note;
use crate::caddy;
use crate::provision::{CopyOptions, DIR_MODE};
use crate::registry::{Group, Registry, SetupContext};

pub(super) fn register(registry: &mut Registry) {
    registry
        .register(Group::Files, "prometheus", setup)
        .register(Group::Caddy, "prometheus", setup_caddy);
}

fn setup(ctx: &mut SetupContext, _service: &str) -> Result<()> {
    ctx.layout.mkdir("prometheus/config", DIR_MODE)?;
    // Written by the container's nobody user
    ctx.layout.mkdir("prometheus/data", 0o777)?;
    operator_note("sudo chown -R 65534:65534 ./data/prometheus/data");
    ctx.layout
        .copy("prometheus/config/prometheus.yml", &ctx.env, CopyOptions::default())?;
    Ok(())
}

fn setup_caddy(ctx: &mut SetupContext, service: &str) -> Result<()> {
    caddy::write_site(ctx, service, "PROMETHEUS_PORT")?;
    Ok(())
}
