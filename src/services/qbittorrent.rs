use anyhow::Result;

use crate::caddy;
use crate::provision::DIR_MODE;
use crate::registry::{Group, Registry, SetupContext};

pub(super) fn register(registry: &mut Registry) {
    registry
        .register(Group::Files, "qbittorrent", setup)
        .register(Group::Caddy, "qbittorrent", setup_caddy);
}

fn setup(ctx: &mut SetupContext, _service: &str) -> Result<()> {
    ctx.layout.mkdir("qbittorrent/config", DIR_MODE)?;
    Ok(())
}

fn setup_caddy(ctx: &mut SetupContext, service: &str) -> Result<()> {
    caddy::write_site(ctx, service, "WEBUI_PORT")?;
    Ok(())
}
