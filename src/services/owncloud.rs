use anyhow::Result;

use super::DatabaseKeys;
use crate::provision::DIR_MODE;
use crate::registry::{Group, Registry, SetupContext};

const DATABASE: DatabaseKeys = DatabaseKeys {
    user: "OWNCLOUD_PG_USER",
    password: "OWNCLOUD_PG_PASSWORD",
    database: "OWNCLOUD_PG_DB",
};

pub(super) fn register(registry: &mut Registry) {
    registry
        .register(Group::Files, "owncloud", setup)
        .register(Group::Database, "owncloud", setup_db);
}

fn setup(ctx: &mut SetupContext, _service: &str) -> Result<()> {
    ctx.layout.mkdir("owncloud/data", DIR_MODE)?;
    // Valkey cache sidecar
    ctx.layout.mkdir("owncloud_valkey/data", DIR_MODE)?;
    Ok(())
}

fn setup_db(ctx: &mut SetupContext, _service: &str) -> Result<()> {
    DATABASE.provision(ctx)
}
