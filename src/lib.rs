pub mod caddy;
pub mod cli;
pub mod cmd;
pub mod db;
pub mod env;
pub mod password;
pub mod paths;
pub mod provision;
pub mod registry;
pub mod services;
pub mod settings;
pub mod template;
