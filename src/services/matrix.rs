//! Synapse homeserver plus the nginx front serving `.well-known`

use anyhow::Result;

use super::DatabaseKeys;
use crate::provision::{CopyOptions, DIR_MODE};
use crate::registry::{Group, Registry, SetupContext};

const DATABASE: DatabaseKeys = DatabaseKeys {
    user: "MATRIX_POSTGRES_USER",
    password: "MATRIX_DB_ROLE_PASSWORD",
    database: "MATRIX_POSTGRES_DB",
};

pub(super) fn register(registry: &mut Registry) {
    registry
        .register(Group::Files, "matrix", setup)
        .register(Group::Database, "matrix", setup_db);
}

fn setup(ctx: &mut SetupContext, _service: &str) -> Result<()> {
    let layout = &ctx.layout;
    let env = &ctx.env;

    layout.mkdir("matrix/synapse", DIR_MODE)?;
    layout.copy("matrix/synapse/homeserver.yaml", env, CopyOptions::default())?;

    layout.mkdir("matrix/nginx/www/.well-known/matrix", DIR_MODE)?;
    layout.copy("matrix/nginx/matrix.conf", env, CopyOptions::default())?;
    layout.copy("matrix/nginx/www/.well-known/matrix/client", env, CopyOptions::default())?;
    layout.copy("matrix/nginx/www/.well-known/matrix/server", env, CopyOptions::default())?;
    Ok(())
}

fn setup_db(ctx: &mut SetupContext, _service: &str) -> Result<()> {
    DATABASE.provision(ctx)
}
