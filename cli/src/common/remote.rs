//! # ggdk Remote Execution (`common::remote`)
//!
//! File: cli/src/common/remote.rs
//!
//! ## Overview
//!
//! `RemoteExecutor` runs commands and copies files either on this machine or
//! on the Greengrass core device over SSH/SCP, depending on whether the
//! resolved `DeployTarget` has a host.
//!
//! ## Architecture
//!
//! Every remote command is the transport prefix followed by the command:
//! - no host: the prefix is empty and the command runs locally
//! - host: `ssh -p <port> [-i <key>] <user>@<host>`
//!
//! so the callers never branch on local vs. remote. Each call is an
//! independent process through the `CommandRunner` seam; there is no retry
//! and no connection reuse. Failures surface as `GdkError::Transport` with the
//! full command line so the operator can re-run it by hand.
//!
use crate::common::process::{CommandOutput, CommandRunner, DEFAULT_TIMEOUT};
use crate::core::error::{GdkError, Result};
use crate::core::local_config::DeployTarget;
use anyhow::anyhow;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

const MISSING_DIR_SIGNATURE: &str = "No such file or directory";

pub struct RemoteExecutor {
    target: DeployTarget,
    runner: Arc<dyn CommandRunner>,
}

impl RemoteExecutor {
    pub fn new(target: DeployTarget, runner: Arc<dyn CommandRunner>) -> Self {
        Self { target, runner }
    }

    /// `[]` for a local target, otherwise `["ssh", "-p", port, ("-i", key), "user@host"]`.
    pub fn transport_prefix(&self) -> Vec<String> {
        let Some(destination) = self.target.ssh_destination() else {
            return Vec::new();
        };
        let mut prefix = vec!["ssh".to_string(), "-p".to_string(), self.target.port.clone()];
        if let Some(key) = &self.target.key_file {
            prefix.push("-i".to_string());
            prefix.push(key.to_string_lossy().into_owned());
        }
        prefix.push(destination);
        prefix
    }

    /// Copies `source` to `destination` with `scp -r`.
    ///
    /// The port and key file come from the target; the copy never goes
    /// through the SSH transport prefix.
    ///
    /// # Arguments
    ///
    /// * `source` - Local file or directory to copy.
    /// * `destination` - scp destination, usually `<user>@<host>:<dir>/`.
    /// * `timeout` - Upper bound for the whole copy, normally `TRANSPORT_TIMEOUT`.
    ///
    /// # Errors
    ///
    /// Returns `GdkError::Transport` carrying the full `scp` command line if
    /// `scp` cannot be started, exits non-zero, or exceeds `timeout`.
    pub async fn copy(&self, source: &str, destination: &str, timeout: Duration) -> Result<()> {
        info!("SCP To: {} From: {}", destination, source);
        let mut argv = vec![
            "scp".to_string(),
            "-r".to_string(),
            "-P".to_string(),
            self.target.port.clone(),
        ];
        if let Some(key) = &self.target.key_file {
            argv.push("-i".to_string());
            argv.push(key.to_string_lossy().into_owned());
        }
        argv.push(source.to_string());
        argv.push(destination.to_string());

        let output = self.execute(&argv, timeout).await?;
        if !output.stdout.is_empty() {
            info!("{}", output.stdout);
        }
        Ok(())
    }

    /// Runs a command on the target through the transport prefix.
    ///
    /// # Arguments
    ///
    /// * `args` - The command and its arguments, without any `ssh` prefix.
    /// * `timeout` - Upper bound for the command, normally `DEFAULT_TIMEOUT`.
    ///
    /// # Returns
    ///
    /// The command's stdout, verbatim.
    ///
    /// # Errors
    ///
    /// Returns `GdkError::Transport` carrying the full command line, prefix
    /// included, if the process cannot be started, exits non-zero, or exceeds
    /// `timeout`.
    pub async fn run_remote(&self, args: &[String], timeout: Duration) -> Result<String> {
        let mut argv = self.transport_prefix();
        argv.extend_from_slice(args);
        let output = self.execute(&argv, timeout).await?;
        info!("{}", output.stdout);
        Ok(output.stdout)
    }

    /// Makes sure `path` exists on the target.
    ///
    /// Runs `ls <path>` first. Only when that fails with "No such file or
    /// directory" on stderr is `mkdir -p <path>` issued, at most once.
    ///
    /// # Arguments
    ///
    /// * `path` - Directory on the target. It is passed to the remote shell
    ///   untouched, so `~` expands there.
    ///
    /// # Errors
    ///
    /// Returns `GdkError::Transport` if `ls` fails for any other reason
    /// (unreachable host, permissions) or if `mkdir -p` fails.
    pub async fn ensure_remote_directory(&self, path: &str) -> Result<()> {
        info!("Checking remote directory {}", path);
        let mut ls = self.transport_prefix();
        ls.extend(["ls".to_string(), path.to_string()]);
        debug!("{}", ls.join(" "));
        let output = self.runner.run(&ls, DEFAULT_TIMEOUT).await?;
        if output.success() {
            return Ok(());
        }
        if !output.stderr.contains(MISSING_DIR_SIGNATURE) {
            return Err(transport_failure(&ls, &output));
        }

        info!("Remote directory {} does not exist, creating it", path);
        let mut mkdir = self.transport_prefix();
        mkdir.extend(["mkdir".to_string(), "-p".to_string(), path.to_string()]);
        let output = self.execute(&mkdir, DEFAULT_TIMEOUT).await?;
        if !output.stdout.is_empty() {
            info!("{}", output.stdout);
        }
        info!("Created remote directory {}", path);
        Ok(())
    }

    async fn execute(&self, argv: &[String], timeout: Duration) -> Result<CommandOutput> {
        debug!("run_command: {}", argv.join(" "));
        let output = self.runner.run(argv, timeout).await?;
        if !output.success() {
            return Err(transport_failure(argv, &output));
        }
        Ok(output)
    }
}

fn transport_failure(argv: &[String], output: &CommandOutput) -> anyhow::Error {
    error!("Command failed");
    error!("Stdout: {}", output.stdout);
    error!("Stderr: {}", output.stderr);
    anyhow!(GdkError::Transport {
        cmd: argv.join(" "),
        reason: output.status_text(),
    })
}
