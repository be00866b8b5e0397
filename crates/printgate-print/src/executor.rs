// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Process execution for print commands.
//
// One `PrintCommand` becomes exactly one child process. Output is captured
// as stdout followed by stderr. Every child runs under a timeout and is
// killed when its future is dropped, so an abandoned request does not leave
// a print program running.

use std::collections::VecDeque;
use std::process::Stdio;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info, warn};

use printgate_core::PrintCommand;
use printgate_core::error::{PrintgateError, Result};

/// Captured result of a successful run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub exit_code: Option<i32>,
    /// stdout followed by stderr.
    pub output: String,
}

/// Runs print and inventory commands.
#[async_trait]
pub trait PrintBackend: Send + Sync {
    /// Run `command` to completion.
    ///
    /// A non-zero exit, spawn failure or timeout is `PrintgateError::Process`
    /// carrying whatever output was captured.
    async fn run(&self, command: &PrintCommand) -> Result<CommandOutput>;
}

/// Spawns real processes with `tokio::process`.
#[derive(Debug, Clone)]
pub struct ProcessBackend {
    timeout: Duration,
}

impl ProcessBackend {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl PrintBackend for ProcessBackend {
    async fn run(&self, command: &PrintCommand) -> Result<CommandOutput> {
        info!(command = %command, "spawning print process");
        let child = Command::new(&command.executable)
            .args(&command.arguments)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                PrintgateError::process(format!("failed to start {}: {e}", command.executable))
            })?;

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(PrintgateError::process(format!(
                    "failed to wait for {}: {e}",
                    command.executable
                )));
            }
            Err(_) => {
                warn!(command = %command, timeout_secs = self.timeout.as_secs(), "print process timed out, killed");
                return Err(PrintgateError::process(format!(
                    "{} timed out after {} s",
                    command.executable,
                    self.timeout.as_secs()
                )));
            }
        };

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        let exit_code = output.status.code();

        if output.status.success() {
            debug!(exit_code, bytes = combined.len(), "print process finished");
            Ok(CommandOutput {
                exit_code,
                output: combined,
            })
        } else {
            warn!(exit_code, command = %command, "print process failed");
            Err(PrintgateError::Process {
                message: format!("{} exited with {}", command.executable, output.status),
                output: combined,
            })
        }
    }
}

/// Scripted outcome for `RecordingBackend`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedOutcome {
    Success(String),
    Failure { message: String, output: String },
}

/// Test double: records every command and replays scripted outcomes.
///
/// When the script runs out, every further run succeeds with empty output.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    commands: Mutex<Vec<PrintCommand>>,
    script: Mutex<VecDeque<ScriptedOutcome>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful run with `output`.
    pub fn with_success(self, output: impl Into<String>) -> Self {
        self.push(ScriptedOutcome::Success(output.into()));
        self
    }

    /// Queue a failed run.
    pub fn with_failure(self, message: impl Into<String>, output: impl Into<String>) -> Self {
        self.push(ScriptedOutcome::Failure {
            message: message.into(),
            output: output.into(),
        });
        self
    }

    fn push(&self, outcome: ScriptedOutcome) {
        self.script
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push_back(outcome);
    }

    /// Commands run so far, in order.
    pub fn commands(&self) -> Vec<PrintCommand> {
        self.commands
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl PrintBackend for RecordingBackend {
    async fn run(&self, command: &PrintCommand) -> Result<CommandOutput> {
        self.commands
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(command.clone());
        let next = self
            .script
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front();
        match next {
            None => Ok(CommandOutput {
                exit_code: Some(0),
                output: String::new(),
            }),
            Some(ScriptedOutcome::Success(output)) => Ok(CommandOutput {
                exit_code: Some(0),
                output,
            }),
            Some(ScriptedOutcome::Failure { message, output }) => {
                Err(PrintgateError::Process { message, output })
            }
        }
    }
}
