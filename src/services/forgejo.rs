use anyhow::Result;

use super::DatabaseKeys;
use crate::caddy;
use crate::provision::DIR_MODE;
use crate::registry::{Group, Registry, SetupContext};

const DATABASE: DatabaseKeys = DatabaseKeys {
    user: "FORGEJO_USER_NAME",
    password: "FORGEJO_PASSWORD",
    database: "FORGEJO_DB_NAME",
};

pub(super) fn register(registry: &mut Registry) {
    registry
        .register(Group::Files, "forgejo", setup)
        .register(Group::Database, "forgejo", setup_db)
        .register(Group::Caddy, "forgejo", setup_caddy);
}

fn setup(ctx: &mut SetupContext, _service: &str) -> Result<()> {
    ctx.layout.mkdir("forgejo/data", DIR_MODE)?;
    Ok(())
}

fn setup_db(ctx: &mut SetupContext, _service: &str) -> Result<()> {
    DATABASE.provision(ctx)
}

fn setup_caddy(ctx: &mut SetupContext, service: &str) -> Result<()> {
    caddy::write_site(ctx, service, "FORGEJO_WEB_PORT")?;
    Ok(())
}
