//! # ggdk Process Execution Utilities (`common::process`)
//!
//! File: cli/src/common/process.rs
//!
//! ## Overview
//!
//! Every interaction with ssh, scp and `greengrass-cli` is an independent
//! external process with a timeout. This module defines the narrow seam those
//! calls go through:
//!
//! - **`CommandRunner`**: `run(argv, timeout) -> CommandOutput`. Higher layers
//!   (`common::remote`, the local commands) only ever talk to this trait.
//! - **`SystemRunner`**: the production implementation on top of
//!   `tokio::process::Command`, capturing stdout/stderr and killing the child
//!   when the timeout expires.
//!
//! A timeout or a failure to spawn is reported as `GdkError::Transport`
//! carrying the full command line. A non-zero exit is *not* an error at this
//! layer; callers inspect `CommandOutput` and decide (see
//! `RemoteExecutor::ensure_remote_directory`, which recovers from one
//! specific failure).
//!
use crate::core::error::{GdkError, Result};
use anyhow::anyhow;
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tracing::debug;

/// Default timeout for a single remote command.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
/// Timeout for copying artifacts and recipes, which may be large.
pub const TRANSPORT_TIMEOUT: Duration = Duration::from_secs(300);

/// Captured result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code; `None` when the process was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Human readable exit status for error messages.
    pub fn status_text(&self) -> String {
        match self.code {
            Some(code) => format!("exit status {}", code),
            None => "terminated by signal".to_string(),
        }
    }
}

/// Runs one external command to completion.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Runs `argv` (program first) and waits at most `timeout` for it to exit.
    async fn run(&self, argv: &[String], timeout: Duration) -> Result<CommandOutput>;
}

/// Spawns real processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, argv: &[String], timeout: Duration) -> Result<CommandOutput> {
        let cmd_line = argv.join(" ");
        let (program, args) = argv.split_first().ok_or_else(|| {
            anyhow!(GdkError::Transport {
                cmd: String::new(),
                reason: "empty command".into(),
            })
        })?;
        debug!("Running: {} (timeout {}s)", cmd_line, timeout.as_secs());

        let mut command = tokio::process::Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = match tokio::time::timeout(timeout, command.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(anyhow!(GdkError::Transport {
                    cmd: cmd_line,
                    reason: format!("failed to start '{}': {}", program, e),
                }))
            }
            // Dropping the output future kills the child (kill_on_drop).
            Err(_) => {
                return Err(anyhow!(GdkError::Transport {
                    cmd: cmd_line,
                    reason: format!("timed out after {}s", timeout.as_secs()),
                }))
            }
        };

        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
