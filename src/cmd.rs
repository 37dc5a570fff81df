use anyhow::{Context, Result};
use std::ffi::OsStr;
use std::io::Write;
use std::process::{Command, Stdio};

const CYAN: &str = "\x1b[36m";
const RESET: &str = "\x1b[0m";

/// Run `program` feeding `input` on stdin
///
/// `envs` are added to the child's environment and never echoed, so they are
/// the place for credentials.
pub fn run_with_stdin<P, I, S>(program: P, args: I, envs: &[(&str, &str)], input: &[u8]) -> Result<()>
where
    P: AsRef<OsStr>,
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let program = program.as_ref();
    let args: Vec<_> = args.into_iter().collect();
    let args_str: Vec<_> = args.iter().map(|s| s.as_ref().to_string_lossy()).collect();
    let program_str = program.to_string_lossy();

    println!("{}> {} {}{}", CYAN, program_str, args_str.join(" "), RESET);

    let mut child = Command::new(program)
        .args(&args)
        .envs(envs.iter().copied())
        .stdin(Stdio::piped())
        .spawn()
        .with_context(|| format!("Failed to run {}", program_str))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(input)
            .with_context(|| format!("Failed to write stdin of {}", program_str))?;
    }

    let status = child.wait()?;
    if !status.success() {
        anyhow::bail!("{} failed with exit code {:?}", program_str, status.code());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_stdin_and_env_to_child() {
        run_with_stdin(
            "sh",
            ["-c", r#"read line; [ "$line" = "hello" ] && [ "$GREETING" = "hi" ]"#],
            &[("GREETING", "hi")],
            b"hello\n",
        )
        .unwrap();
    }

    #[test]
    fn non_zero_exit_is_an_error() {
        let err = run_with_stdin("sh", ["-c", "exit 3"], &[], b"").unwrap_err();
        assert!(err.to_string().contains("exit code Some(3)"));
    }

    #[test]
    fn missing_program_is_an_error() {
        let err = run_with_stdin("/nonexistent/psql", ["-V"], &[], b"").unwrap_err();
        assert!(err.to_string().contains("Failed to run"));
    }
}
