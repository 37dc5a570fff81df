use anyhow::Result;

use crate::provision::{CopyOptions, DIR_MODE};
use crate::registry::{Group, Registry, SetupContext};

pub(super) fn register(registry: &mut Registry) {
    registry.register(Group::Files, "postgres", setup);
}

fn setup(ctx: &mut SetupContext, _service: &str) -> Result<()> {
    ctx.layout.mkdir("postgres/data", DIR_MODE)?;
    ctx.layout.mkdir("postgres/init", DIR_MODE)?;
    // Runs on first start of an empty cluster
    ctx.layout
        .copy("postgres/init/services.sql", &ctx.env, CopyOptions::default())?;
    Ok(())
}
