use anyhow::Result;
use std::path::PathBuf;

use super::{ConnectionParams, SqlBackend, SqlError};
use crate::cmd;

/// Backend driving the `psql` command line client
///
/// Each statement is a separate `psql` session. The password travels in
/// `PGPASSWORD` and the statement on stdin, so neither shows up in the
/// echoed command line.
#[derive(Debug, Clone)]
pub struct Psql {
    program: String,
}

impl Psql {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn locate(&self) -> Result<PathBuf, SqlError> {
        which::which(&self.program).map_err(|e| SqlError::ClientNotFound(format!("{} ({})", self.program, e)))
    }

    /// Arguments for one session; the statement itself goes to stdin
    pub fn args(conn: &ConnectionParams, autocommit: bool) -> Vec<String> {
        let mut args = vec![
            "--no-psqlrc".to_string(),
            "--quiet".into(),
            "-v".into(),
            "ON_ERROR_STOP=1".into(),
            "-h".into(),
            conn.host.clone(),
            "-p".into(),
            conn.port.clone(),
            "-U".into(),
            conn.user.clone(),
            "-d".into(),
            conn.database.clone(),
        ];

        if !autocommit {
            args.push("--single-transaction".into());
        }

        args.push("-f".into());
        args.push("-".into());
        args
    }
}

impl SqlBackend for Psql {
    fn execute(&self, conn: &ConnectionParams, statement: &str, autocommit: bool) -> Result<()> {
        let program = self.locate()?;
        let input = format!("{};\n", statement);

        cmd::run_with_stdin(
            &program,
            Self::args(conn, autocommit),
            &[("PGPASSWORD", conn.password.as_str())],
            input.as_bytes(),
        )
    }
}
