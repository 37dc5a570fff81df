use anyhow::Result;

use super::operator_note;
use crate::provision::DIR_MODE;
use crate::registry::{Group, Registry, SetupContext};

pub(super) fn register(registry: &mut Registry) {
    registry.register(Group::Files, "collabora", setup);
}

fn setup(ctx: &mut SetupContext, _service: &str) -> Result<()> {
    ctx.layout.mkdir("collabora/data", DIR_MODE)?;
    operator_note("sudo chown -R 101:101 ./data/collabora/data");
    Ok(())
}
