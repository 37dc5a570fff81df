//! The reverse proxy itself; per-service site files live under `caddy/conf`

use anyhow::Result;

use crate::provision::{CopyOptions, DIR_MODE};
use crate::registry::{Group, Registry, SetupContext};

const DIRS: &[&str] = &[
    "caddy/data",
    "caddy/site",
    "caddy/conf",
    "caddy/config",
    "caddy/log",
    "caddy/certs",
];

pub(super) fn register(registry: &mut Registry) {
    registry.register(Group::Files, "caddy", setup);
}

fn setup(ctx: &mut SetupContext, _service: &str) -> Result<()> {
    for dir in DIRS {
        ctx.layout.mkdir(dir, DIR_MODE)?;
    }

    ctx.layout
        .copy("caddy/conf/Caddyfile", &ctx.env, CopyOptions::default())?;
    ctx.layout
        .copy("caddy/caddy.Dockerfile", &ctx.env, CopyOptions::raw())?;
    Ok(())
}
