//! SQL provisioning against the stack's PostgreSQL server
//!
//! Queries are written as `$`-templates over the env, split into single
//! statements and sent one session at a time through a [`SqlBackend`].

mod psql;

pub use psql::Psql;

use thiserror::Error;

use crate::env::{Env, EnvError};
use crate::template::safe_substitute;

/// Statements PostgreSQL refuses to run inside a transaction block
const AUTOCOMMIT_COMMANDS: &[&str] = &["CREATE DATABASE", "DROP DATABASE", "ALTER SYSTEM"];

#[derive(Debug, Error)]
pub enum SqlError {
    #[error(transparent)]
    Env(#[from] EnvError),
    #[error("psql client not found: {0}")]
    ClientNotFound(String),
    #[error("Error executing '{statement}': {source}")]
    Statement {
        statement: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

/// Where and as whom to connect
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionParams {
    pub host: String,
    pub port: String,
    pub database: String,
    pub user: String,
    pub password: String,
}

impl ConnectionParams {
    /// Superuser connection from the env
    ///
    /// From the host the server is reached on its published port
    /// (`POSTGRES_OUT_PORT`); inside the container network on
    /// `POSTGRES_HOST:POSTGRES_PORT`.
    pub fn from_env(env: &Env, in_docker: bool) -> Result<Self, EnvError> {
        let (host, port) = if in_docker {
            (env.require("POSTGRES_HOST")?, env.require("POSTGRES_PORT")?)
        } else {
            ("localhost", env.require("POSTGRES_OUT_PORT")?)
        };

        Ok(Self {
            host: host.to_string(),
            port: port.to_string(),
            database: env.require("POSTGRES_DB")?.to_string(),
            user: env.require("POSTGRES_USER")?.to_string(),
            password: env.require("POSTGRES_PASSWORD")?.to_string(),
        })
    }
}

/// Runs one statement in its own session
pub trait SqlBackend {
    /// With `autocommit` false the statement must be committed as a
    /// transaction; with `autocommit` true it must run outside one.
    fn execute(&self, conn: &ConnectionParams, statement: &str, autocommit: bool) -> anyhow::Result<()>;
}

pub struct PostgresExecutor<'a> {
    env: &'a Env,
    conn: ConnectionParams,
    backend: &'a dyn SqlBackend,
}

impl<'a> PostgresExecutor<'a> {
    pub fn new(env: &'a Env, in_docker: bool, backend: &'a dyn SqlBackend) -> Result<Self, SqlError> {
        Ok(Self {
            env,
            conn: ConnectionParams::from_env(env, in_docker)?,
            backend,
        })
    }

    /// Substitute, split and run every statement of `query_template`
    ///
    /// Stops at the first failing statement.
    pub fn execute(&self, query_template: &str) -> Result<(), SqlError> {
        let query = safe_substitute(query_template, self.env);

        for statement in split_statements(&query) {
            let autocommit = needs_autocommit(statement);
            tracing::debug!("Executing statement (autocommit: {})", autocommit);

            if let Err(source) = self.backend.execute(&self.conn, statement, autocommit) {
                tracing::error!("Error executing '{}': {:#}", statement, source);
                return Err(SqlError::Statement {
                    statement: statement.to_string(),
                    source: source.into(),
                });
            }
        }

        Ok(())
    }
}

/// Split on `;` dropping whitespace-only pieces
pub fn split_statements(query: &str) -> Vec<&str> {
    query
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

pub fn needs_autocommit(statement: &str) -> bool {
    let upper = statement.to_uppercase();
    AUTOCOMMIT_COMMANDS.iter().any(|cmd| upper.contains(cmd))
}

/// Login role with password and a database it owns
///
/// The arguments are env keys, not values; they are substituted when the
/// query is executed.
pub fn owned_database_query(user_key: &str, password_key: &str, db_key: &str) -> String {
    format!(
        "CREATE ROLE ${{{user}}};
ALTER ROLE ${{{user}}} WITH PASSWORD '${{{password}}}';
ALTER ROLE ${{{user}}} WITH LOGIN;
CREATE DATABASE ${{{db}}} ENCODING 'UTF8' LC_COLLATE='C' LC_CTYPE='C' template=template0 OWNER ${{{user}}};
GRANT ALL PRIVILEGES ON DATABASE ${{{db}}} TO ${{{user}}};
",
        user = user_key,
        password = password_key,
        db = db_key,
    )
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingBackend;
    use super::*;

    fn env() -> Env {
        [
            ("POSTGRES_HOST", "postgres"),
            ("POSTGRES_PORT", "5432"),
            ("POSTGRES_OUT_PORT", "15432"),
            ("POSTGRES_DB", "postgres"),
            ("POSTGRES_USER", "admin"),
            ("POSTGRES_PASSWORD", "pw"),
            ("GITEA_USER_NAME", "gitea"),
            ("GITEA_PASSWORD", "gitea-pw"),
            ("GITEA_DB_NAME", "giteadb"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn split_drops_empty_statements() {
        assert_eq!(
            split_statements("\n  CREATE ROLE a;\n\n ; GRANT x TO a ;  \n"),
            vec!["CREATE ROLE a", "GRANT x TO a"]
        );
        assert!(split_statements(" ; \n ;").is_empty());
    }

    #[test]
    fn autocommit_only_for_transactionless_ddl() {
        assert!(needs_autocommit("CREATE DATABASE app OWNER app"));
        assert!(needs_autocommit("drop database app"));
        assert!(needs_autocommit("alter system set work_mem = '64MB'"));
        assert!(!needs_autocommit("CREATE ROLE app"));
        assert!(!needs_autocommit("GRANT ALL PRIVILEGES ON DATABASE app TO app"));
    }

    #[test]
    fn connection_from_host_uses_published_port() {
        let conn = ConnectionParams::from_env(&env(), false).unwrap();
        assert_eq!(conn.host, "localhost");
        assert_eq!(conn.port, "15432");
        assert_eq!(conn.database, "postgres");
        assert_eq!(conn.user, "admin");
        assert_eq!(conn.password, "pw");
    }

    #[test]
    fn connection_in_docker_uses_service_host() {
        let conn = ConnectionParams::from_env(&env(), true).unwrap();
        assert_eq!(conn.host, "postgres");
        assert_eq!(conn.port, "5432");
    }

    #[test]
    fn connection_requires_credentials() {
        let env: Env = [("POSTGRES_OUT_PORT", "1")].into_iter().collect();
        assert_eq!(
            ConnectionParams::from_env(&env, false),
            Err(EnvError::Missing("POSTGRES_DB".into()))
        );
    }

    #[test]
    fn executes_owned_database_query_statement_by_statement() {
        let env = env();
        let backend = RecordingBackend::default();
        let executor = PostgresExecutor::new(&env, false, &backend).unwrap();

        executor
            .execute(&owned_database_query("GITEA_USER_NAME", "GITEA_PASSWORD", "GITEA_DB_NAME"))
            .unwrap();

        let executed = backend.executed.borrow();
        assert_eq!(
            *executed,
            vec![
                ("CREATE ROLE gitea".to_string(), false),
                ("ALTER ROLE gitea WITH PASSWORD 'gitea-pw'".to_string(), false),
                ("ALTER ROLE gitea WITH LOGIN".to_string(), false),
                (
                    "CREATE DATABASE giteadb ENCODING 'UTF8' LC_COLLATE='C' LC_CTYPE='C' template=template0 OWNER gitea"
                        .to_string(),
                    true
                ),
                ("GRANT ALL PRIVILEGES ON DATABASE giteadb TO gitea".to_string(), false),
            ]
        );
    }

    #[test]
    fn first_failure_aborts_remaining_statements() {
        let env = env();
        let backend = RecordingBackend {
            fail_on: Some("CREATE ROLE".into()),
            ..Default::default()
        };
        let executor = PostgresExecutor::new(&env, false, &backend).unwrap();

        let err = executor.execute("CREATE ROLE a; GRANT x TO a;").unwrap_err();

        assert!(matches!(&err, SqlError::Statement { statement, .. } if statement == "CREATE ROLE a"));
        assert!(err.to_string().contains("role already exists"));
        assert!(backend.executed.borrow().is_empty());
    }

    #[test]
    fn query_template_keys_are_not_values() {
        let query = owned_database_query("U", "P", "D");
        assert!(query.contains("CREATE ROLE ${U};"));
        assert!(query.contains("WITH PASSWORD '${P}'"));
        assert!(query.contains("ON DATABASE ${D} TO ${U}"));
    }
}
