//! Test module organization for vnstat collection
//!
//! Shared fakes live here; the focused suites are in the submodules.

pub mod listing_tests;

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::collectors::vnstat::errors::CollectionError;
use crate::collectors::vnstat::runner::CommandRunner;

pub const SAMPLE_REPORT: &str = include_str!("../../../../tests/fixtures/vnstat_eth0.json");

/// Replays canned output keyed by the joined argument list
#[derive(Default)]
pub struct ScriptedRunner {
    outputs: HashMap<String, Result<String, String>>,
    calls: Mutex<Vec<(String, Vec<String>)>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, args: &str, output: &str) -> Self {
        self.outputs.insert(args.to_string(), Ok(output.to_string()));
        self
    }

    pub fn fail(mut self, args: &str, reason: &str) -> Self {
        self.outputs.insert(args.to_string(), Err(reason.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<String, CollectionError> {
        self.calls
            .lock()
            .unwrap()
            .push((program.to_string(), args.to_vec()));

        match self.outputs.get(&args.join(" ")) {
            Some(Ok(output)) => Ok(output.clone()),
            Some(Err(reason)) => Err(CollectionError::invocation(program, reason.clone())),
            None => Err(CollectionError::invocation(
                program,
                format!("unexpected arguments {args:?}"),
            )),
        }
    }
}
