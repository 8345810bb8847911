#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;

use vnstat_watcher::collectors::vnstat::{CollectionError, CommandRunner};

pub const SAMPLE_REPORT: &str = include_str!("../fixtures/vnstat_eth0.json");
pub const SAMPLE_REPORT_V1: &str = include_str!("../fixtures/vnstat1_eth0.json");

/// Canned vnstat: answers `-i <iface> --json` and `-i <iface>` per interface
#[derive(Default)]
pub struct FakeVnstat {
    reports: HashMap<String, String>,
    dashboards: HashMap<String, String>,
    showconfig: Option<String>,
    broken: bool,
}

impl FakeVnstat {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_report(mut self, iface: &str, json: &str) -> Self {
        self.reports.insert(iface.to_string(), json.to_string());
        self
    }

    pub fn with_dashboard(mut self, iface: &str, text: &str) -> Self {
        self.dashboards.insert(iface.to_string(), text.to_string());
        self
    }

    pub fn with_database_dir(mut self, dir: &std::path::Path) -> Self {
        self.showconfig = Some(format!("DatabaseDir \"{}\"\n", dir.display()));
        self
    }

    /// Every invocation exits with a failure status
    pub fn broken() -> Self {
        Self {
            broken: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl CommandRunner for FakeVnstat {
    async fn run(&self, program: &str, args: &[String]) -> Result<String, CollectionError> {
        if self.broken {
            return Err(CollectionError::invocation(program, "exit status: 1"));
        }

        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        let found = match args.as_slice() {
            ["-i", iface, "--json"] => self.reports.get(*iface),
            ["-i", iface] => self.dashboards.get(*iface),
            ["--showconfig"] => self.showconfig.as_ref(),
            _ => None,
        };

        found
            .cloned()
            .ok_or_else(|| CollectionError::invocation(program, format!("Error: unknown request {args:?}")))
    }
}
