use anyhow::Result;

use super::DatabaseKeys;
use crate::provision::DIR_MODE;
use crate::registry::{Group, Registry, SetupContext};

const DATABASE: DatabaseKeys = DatabaseKeys {
    user: "NEXTCLOUD_PG_USER",
    password: "NEXTCLOUD_PG_PASSWORD",
    database: "NEXTCLOUD_PG_DB",
};

pub(super) fn register(registry: &mut Registry) {
    registry
        .register(Group::Files, "nextcloud", setup)
        .register(Group::Database, "nextcloud", setup_db);
}

fn setup(ctx: &mut SetupContext, _service: &str) -> Result<()> {
    ctx.layout.mkdir("nextcloud/data", DIR_MODE)?;
    Ok(())
}

fn setup_db(ctx: &mut SetupContext, _service: &str) -> Result<()> {
    DATABASE.provision(ctx)
}
