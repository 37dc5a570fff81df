//! The catalogue of services this stack knows how to provision
//!
//! Each module registers its callbacks into the file, database and caddy
//! groups. Registration order is the order `all` runs them in.

mod caddy;
mod calibre;
mod collabora;
mod forgejo;
mod gitea;
mod grafana;
mod linkwarden;
mod matrix;
mod nextcloud;
mod owncloud;
mod postgres;
mod prometheus;
mod qbittorrent;
mod syncthing;
mod traefik;
mod trilium;

use anyhow::Result;

use crate::db::owned_database_query;
use crate::registry::{Registry, SetupContext};

/// Registry holding every known service
pub fn registry() -> Registry {
    let mut registry = Registry::new();

    postgres::register(&mut registry);
    traefik::register(&mut registry);
    matrix::register(&mut registry);
    trilium::register(&mut registry);
    qbittorrent::register(&mut registry);
    gitea::register(&mut registry);
    forgejo::register(&mut registry);
    linkwarden::register(&mut registry);
    grafana::register(&mut registry);
    prometheus::register(&mut registry);
    calibre::register(&mut registry);
    nextcloud::register(&mut registry);
    owncloud::register(&mut registry);
    collabora::register(&mut registry);
    syncthing::register(&mut registry);
    caddy::register(&mut registry);

    registry
}

/// Env keys naming a service's database role, its password and database
struct DatabaseKeys {
    user: &'static str,
    password: &'static str,
    database: &'static str,
}

impl DatabaseKeys {
    fn provision(&self, ctx: &SetupContext) -> Result<()> {
        let query = owned_database_query(self.user, self.password, self.database);
        ctx.postgres()?.execute(&query)?;
        Ok(())
    }
}

/// Print a manual step the operator still has to perform
fn operator_note(command: &str) {
    println!("NEED TO EXEC: \"{}\"", command);
}
