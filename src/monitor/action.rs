//! Trigger action executed when the transfer limit is reached

use async_trait::async_trait;
use log::debug;
use std::fmt;
use thiserror::Error;
use tokio::process::Command;

/// Command run when no action is configured
pub const DEFAULT_ACTION: &str = "shutdown";

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("action command is empty")]
    EmptyCommand,

    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{program}' exited with {status}: {output}")]
    Failed {
        program: String,
        status: String,
        output: String,
    },
}

/// Program plus arguments, split on whitespace without shell interpretation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionCommand {
    program: String,
    args: Vec<String>,
}

impl ActionCommand {
    pub fn parse(command_line: &str) -> Result<Self, ActionError> {
        let mut words = command_line.split_whitespace().map(str::to_string);
        let program = words.next().ok_or(ActionError::EmptyCommand)?;
        Ok(Self {
            program,
            args: words.collect(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for ActionCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Executes the trigger action and returns whatever it printed
#[async_trait]
pub trait ActionRunner: Send + Sync {
    async fn execute(&self, command: &ActionCommand) -> Result<String, ActionError>;
}

/// Runs the action as a child process
#[derive(Debug, Default, Clone, Copy)]
pub struct CommandActionRunner;

#[async_trait]
impl ActionRunner for CommandActionRunner {
    async fn execute(&self, command: &ActionCommand) -> Result<String, ActionError> {
        debug!("Executing action: {}", command);

        let output = Command::new(command.program())
            .args(command.args())
            .output()
            .await
            .map_err(|source| ActionError::Spawn {
                program: command.program().to_string(),
                source,
            })?;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));

        if !output.status.success() {
            return Err(ActionError::Failed {
                program: command.program().to_string(),
                status: output.status.to_string(),
                output: text.trim().to_string(),
            });
        }
        Ok(text)
    }
}
