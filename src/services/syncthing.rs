use anyhow::Result;

use crate::caddy;
use crate::provision::DIR_MODE;
use crate::registry::{Group, Registry, SetupContext};

pub(super) fn register(registry: &mut Registry) {
    registry
        .register(Group::Files, "syncthing", setup)
        .register(Group::Caddy, "syncthing", setup_caddy);
}

fn setup(ctx: &mut SetupContext, _service: &str) -> Result<()> {
    ctx.layout.mkdir("syncthing/data", DIR_MODE)?;
    Ok(())
}

fn setup_caddy(ctx: &mut SetupContext, service: &str) -> Result<()> {
    caddy::write_site(ctx, service, "SYNCTHING_WEB_PORT")?;
    Ok(())
}
