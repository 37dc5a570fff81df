//! Caddy site stanzas for services published through the reverse proxy

use anyhow::Result;

use crate::provision::{Outcome, FILE_MODE};
use crate::registry::SetupContext;

/// Site block routing `<service>.<domain>` to `server_ip:port`
///
/// `{$DESEC_DOMAIN}` is left for Caddy to expand from its own environment.
pub fn render_site(service: &str, server_ip: &str, port: &str) -> String {
    format!(
        "import logs {service}
@{service} host {service}.{{$DESEC_DOMAIN}}
handle @{service} {{
        reverse_proxy {server_ip}:{port}
}}
"
    )
}

/// Write the stanza for `service` to `caddy/conf/<domain>/<service>.caddyfile`
///
/// The upstream is `WG_INTERNAL_SERVER` on the port stored under `port_key`.
/// The file is regenerated on every run.
pub fn write_site(ctx: &SetupContext, service: &str, port_key: &str) -> Result<Outcome> {
    let server_ip = ctx.env.require("WG_INTERNAL_SERVER")?;
    let port = ctx.env.require(port_key)?;
    let domain = ctx.env.require("DESEC_DOMAIN")?;

    let config = render_site(service, server_ip, port);
    let path = format!("caddy/conf/{}/{}.caddyfile", domain, service);

    ctx.layout.create_file(path, FILE_MODE, Some(config.as_str()))
}
