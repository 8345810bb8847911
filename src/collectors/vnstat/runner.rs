//! Process boundary for the vnstat binary
//!
//! The collector never spawns processes itself; it goes through a
//! `CommandRunner` so tests can hand it canned output.

use async_trait::async_trait;
use log::{debug, trace};
use tokio::process::Command;

use crate::collectors::vnstat::errors::CollectionError;

/// Runs an external program and returns its standard output
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, program: &str, args: &[String]) -> Result<String, CollectionError>;
}

/// Spawns real processes with `tokio::process`, without a shell
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCommandRunner;

#[async_trait]
impl CommandRunner for SystemCommandRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<String, CollectionError> {
        debug!("Running {} {}", program, args.join(" "));

        let output = Command::new(program)
            .args(args)
            .output()
            .await
            .map_err(|e| CollectionError::invocation(program, e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CollectionError::invocation(
                program,
                format!("{} ({})", output.status, stderr.trim()),
            ));
        }

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        trace!("{} produced {} bytes of output", program, stdout.len());
        Ok(stdout)
    }
}
