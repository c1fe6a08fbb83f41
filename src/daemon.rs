//! External daemon invocation.
//!
//! Chain and coordination daemons are driven as subprocesses so key
//! management, genesis serialization and transaction signing stay owned by
//! the chain tooling.
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::Instant;

/// A daemon command line: the program plus any leading arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Daemon {
    argv: Vec<String>,
}

impl Daemon {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            argv: vec![program.into()],
        }
    }

    /// Parse a shell-style command such as `nix run .#spnd --`.
    pub fn from_command(command: &str) -> Result<Self> {
        let argv = shell_words::split(command)
            .map_err(|err| Error::Config(format!("parse daemon command {command:?}: {err}")))?;
        if argv.is_empty() {
            return Err(Error::Config("daemon command is empty".to_string()));
        }
        Ok(Self { argv })
    }

    /// Locate `name` on `PATH`.
    pub fn find(name: &str) -> Result<Self> {
        let path = which::which(name).map_err(|err| Error::Daemon {
            program: name.to_string(),
            detail: format!("not found on PATH ({err})"),
        })?;
        Ok(Self::new(path_to_string(&path)))
    }

    pub fn program(&self) -> &str {
        self.argv.first().map(String::as_str).unwrap_or_default()
    }

    /// Run the daemon and return its raw output, whatever the exit status.
    pub fn run(&self, args: &[String]) -> Result<Output> {
        let start = Instant::now();
        let output = Command::new(self.program())
            .args(&self.argv[1..])
            .args(args)
            .output()
            .map_err(|err| Error::Daemon {
                program: self.program().to_string(),
                detail: format!("spawn: {err}"),
            })?;
        let elapsed_ms = start.elapsed().as_millis();

        tracing::info!(
            program = self.program(),
            subcommand = args.first().map(String::as_str).unwrap_or_default(),
            elapsed_ms,
            stdout_bytes = output.stdout.len(),
            success = output.status.success(),
            "daemon call complete"
        );
        Ok(output)
    }

    /// Run the daemon and fail unless it exits successfully.
    pub fn run_checked(&self, args: &[String]) -> Result<Vec<u8>> {
        let output = self.run(args)?;
        if !output.status.success() {
            return Err(Error::Daemon {
                program: self.program().to_string(),
                detail: failure_detail(&output),
            });
        }
        Ok(output.stdout)
    }
}

/// First stderr line, or the exit status when stderr is empty.
pub(crate) fn failure_detail(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    match stderr.trim().lines().next() {
        Some(line) if !line.is_empty() => line.to_string(),
        _ => format!("status {}", output.status),
    }
}

pub(crate) fn path_to_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Keyring flags shared by every daemon that touches keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyringOptions {
    pub backend: String,
    pub dir: Option<PathBuf>,
}

impl KeyringOptions {
    pub fn args(&self) -> Vec<String> {
        let mut args = vec!["--keyring-backend".to_string(), self.backend.clone()];
        if let Some(dir) = &self.dir {
            args.push("--keyring-dir".to_string());
            args.push(path_to_string(dir));
        }
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_command_keeps_leading_arguments() {
        let daemon = Daemon::from_command("nix run '.#spnd' --").unwrap();
        assert_eq!(daemon.program(), "nix");
        assert_eq!(daemon.argv, vec!["nix", "run", ".#spnd", "--"]);
    }

    #[test]
    fn from_command_rejects_empty() {
        assert!(Daemon::from_command("  ").is_err());
    }

    #[test]
    fn keyring_args_include_dir_when_set() {
        let keyring = KeyringOptions {
            backend: "test".to_string(),
            dir: Some(PathBuf::from("/keys")),
        };
        assert_eq!(
            keyring.args(),
            vec!["--keyring-backend", "test", "--keyring-dir", "/keys"]
        );
    }

    #[cfg(unix)]
    #[test]
    fn run_checked_reports_first_stderr_line() {
        let daemon = Daemon::from_command("sh -c").unwrap();
        let err = daemon
            .run_checked(&["echo bad >&2; echo more >&2; exit 3".to_string()])
            .unwrap_err();
        assert_eq!(err.to_string(), "sh failed: bad");
    }
}
