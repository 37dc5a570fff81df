use anyhow::Result;

use super::DatabaseKeys;
use crate::provision::DIR_MODE;
use crate::registry::{Group, Registry, SetupContext};

const DATABASE: DatabaseKeys = DatabaseKeys {
    user: "GITEA_USER_NAME",
    password: "GITEA_PASSWORD",
    database: "GITEA_DB_NAME",
};

pub(super) fn register(registry: &mut Registry) {
    registry
        .register(Group::Files, "gitea", setup)
        .register(Group::Database, "gitea", setup_db);
}

fn setup(ctx: &mut SetupContext, _service: &str) -> Result<()> {
    ctx.layout.mkdir("gitea/data", DIR_MODE)?;
    Ok(())
}

fn setup_db(ctx: &mut SetupContext, _service: &str) -> Result<()> {
    DATABASE.provision(ctx)
}
