//! Invocation of the external account-management CLI
//!
//! The CLI is run as `<binary> <subcommand> <args...>` with one extra
//! environment variable asking for API-friendly output. Whatever it prints
//! on stdout is returned as-is, whatever the exit code. A CLI that cannot be
//! started yields its error text instead, which then simply fails to parse.

use crate::config::CliConfig;
use std::future::Future;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum InvokeError {
    #[error("Command timed out after {0} seconds")]
    Timeout(u64),
    #[error("Failed to wait for command: {0}")]
    WaitError(#[from] std::io::Error),
}

/// An account operation and its positional arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountCommand {
    Add {
        user: String,
        password: String,
        days: String,
    },
    Trial {
        user: String,
        minutes: String,
    },
    Renew {
        user: String,
        days: String,
    },
    Delete {
        user: String,
    },
}

impl AccountCommand {
    /// CLI subcommand name
    pub fn subcommand(&self) -> &'static str {
        match self {
            AccountCommand::Add { .. } => "add",
            AccountCommand::Trial { .. } => "trial",
            AccountCommand::Renew { .. } => "renew",
            // Non-interactive variant, plain `del` asks for confirmation
            AccountCommand::Delete { .. } => "del_api",
        }
    }

    pub fn user(&self) -> &str {
        match self {
            AccountCommand::Add { user, .. }
            | AccountCommand::Trial { user, .. }
            | AccountCommand::Renew { user, .. }
            | AccountCommand::Delete { user } => user,
        }
    }

    /// Full argument vector, subcommand first
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![self.subcommand().to_string()];
        match self {
            AccountCommand::Add {
                user,
                password,
                days,
            } => args.extend([user.clone(), password.clone(), days.clone()]),
            AccountCommand::Trial { user, minutes } => {
                args.extend([user.clone(), minutes.clone()])
            }
            AccountCommand::Renew { user, days } => args.extend([user.clone(), days.clone()]),
            AccountCommand::Delete { user } => args.push(user.clone()),
        }
        args
    }
}

/// Runs the CLI with the given arguments and returns its stdout
pub trait CommandRunner: Send + Sync + 'static {
    fn run(&self, args: Vec<String>) -> impl Future<Output = Result<String, InvokeError>> + Send;
}

/// The real CLI, one child process per call
#[derive(Debug, Clone)]
pub struct ZivpnCli {
    binary: PathBuf,
    api_env: String,
    timeout: Option<Duration>,
}

impl ZivpnCli {
    pub fn new(binary: PathBuf, api_env: String, timeout: Option<Duration>) -> Self {
        Self {
            binary,
            api_env,
            timeout,
        }
    }

    pub fn from_config(config: &CliConfig) -> Self {
        let timeout = (config.timeout_secs > 0).then(|| Duration::from_secs(config.timeout_secs));
        Self::new(config.binary.clone(), config.api_env.clone(), timeout)
    }
}

impl CommandRunner for ZivpnCli {
    async fn run(&self, args: Vec<String>) -> Result<String, InvokeError> {
        info!("Running {} {}", self.binary.display(), args.join(" "));

        let child = Command::new(&self.binary)
            .args(&args)
            .env(&self.api_env, "1")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn();

        let child = match child {
            Ok(child) => child,
            Err(e) => {
                warn!("Failed to start {}: {}", self.binary.display(), e);
                return Ok(e.to_string());
            }
        };

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
                .await
                .map_err(|_| InvokeError::Timeout(limit.as_secs()))??,
            None => child.wait_with_output().await?,
        };

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        debug!("CLI exited with {}, output: {:?}", output.status, stdout);
        Ok(stdout)
    }
}
