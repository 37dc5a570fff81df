use anyhow::Result;

use super::DatabaseKeys;
use crate::caddy;
use crate::provision::DIR_MODE;
use crate::registry::{Group, Registry, SetupContext};

const DATABASE: DatabaseKeys = DatabaseKeys {
    user: "LINKWARDEN_PSQL_USER",
    password: "LINKWARDEN_PSQL_PASSWORD",
    database: "LINKWARDEN_PSQL_DB_NAME",
};

pub(super) fn register(registry: &mut Registry) {
    registry
        .register(Group::Files, "linkwarden", setup)
        .register(Group::Database, "linkwarden", setup_db)
        .register(Group::Caddy, "linkwarden", setup_caddy);
}

fn setup(ctx: &mut SetupContext, _service: &str) -> Result<()> {
    ctx.layout.mkdir("linkwarden/data", DIR_MODE)?;
    Ok(())
}

fn setup_db(ctx: &mut SetupContext, _service: &str) -> Result<()> {
    DATABASE.provision(ctx)
}

fn setup_caddy(ctx: &mut SetupContext, service: &str) -> Result<()> {
    caddy::write_site(ctx, service, "LINKWARDEN_PORT")?;
    Ok(())
}
