use anyhow::Result;

use crate::password::create_password;
use crate::provision::{CopyOptions, DIR_MODE};
use crate::registry::{Group, Registry, SetupContext};

pub(super) fn register(registry: &mut Registry) {
    registry.register(Group::Files, "traefik", setup);
}

fn setup(ctx: &mut SetupContext, _service: &str) -> Result<()> {
    // The users file template expects the hash, not the plaintext
    let hash = create_password(ctx.env.require("T_ADMIN_PASSWORD")?)?;
    ctx.env.insert("T_ADMIN_PASSWORD_HASH", hash);

    let layout = &ctx.layout;
    let env = &ctx.env;

    layout.mkdir("traefik/config", DIR_MODE)?;
    layout.create_file("traefik/acme.json", 0o600, None)?;
    layout.copy("traefik/traefik.yml", env, CopyOptions::default())?;
    layout.copy("traefik/usersfile", env, CopyOptions::default())?;
    layout.copy("traefik/config/middlewares.yml", env, CopyOptions::default())?;
    layout.copy("traefik/config/routers.yml", env, CopyOptions::default())?;
    layout.copy("traefik/config/tls.yml", env, CopyOptions::raw())?;
    Ok(())
}
