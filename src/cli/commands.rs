use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::AppConfig;

/// Main CLI structure for the vnstat-watcher application
/// Uses clap's derive macros for automatic CLI generation
#[derive(Parser)]
#[command(author = "Kaipo Chen")]
#[command(version)] // Automatically uses version from Cargo.toml
#[command(about = "vnstat watcher - Serve vnstat traffic statistics over HTTP and enforce a monthly transfer limit")]
#[command(long_about = "vnstat watcher exposes the traffic databases kept by vnstat as JSON over HTTP. \
When an interface is given it also watches that interface's transfer for the current month \
and runs a command (shutdown by default) once the limit is reached.")]
pub struct Cli {
    /// Configuration file (TOML); defaults to ./vw.toml when present
    #[arg(long, global = true, help = "Path to configuration file")]
    pub config: Option<PathBuf>,

    /// vnstat executable to run
    #[arg(long, global = true, help = "Path to the vnstat binary")]
    pub vnstat_bin: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands for the vnstat-watcher application
#[derive(Subcommand)]
pub enum Commands {
    /// Serve statistics over HTTP, optionally watching one interface's monthly limit
    #[command(about = "Serve statistics over HTTP and optionally enforce a transfer limit")]
    #[command(long_about = "Starts the HTTP server. When --interface is set, a background monitor \
polls the interface's transfer for the current month every five minutes and runs the configured \
command exactly once when the limit is reached.\n\n\
Examples:\n  \
vw serve                                  # HTTP only\n  \
vw serve -i eth0 -l 500                   # Shut down after 500 GiB this month\n  \
vw serve -i eth0 -l 500 -c 'systemctl suspend'\n  \
vw serve --listen 127.0.0.1:8080          # Custom listen address")]
    Serve {
        /// Interface to monitor; the monitor is disabled when omitted
        #[arg(short = 'i', long, help = "Monitored interface")]
        interface: Option<String>,

        /// Monthly transfer limit in GiB
        #[arg(short = 'l', long, help = "Bandwidth usage limit (in GiB)")]
        limit: Option<u64>,

        /// Command to run once the limit is reached
        #[arg(short = 'c', long, help = "Command to execute on exceed of bandwidth")]
        command: Option<String>,

        /// Address the HTTP server binds to
        #[arg(long, help = "Listen address, e.g. 0.0.0.0:7007")]
        listen: Option<String>,
    },

    /// Print the JSON report for an interface
    #[command(about = "Print the JSON traffic report for an interface")]
    Report {
        interface: String,

        #[arg(short, long, help = "Indent the JSON output")]
        pretty: bool,
    },

    /// Print vnstat's own summary for an interface
    #[command(about = "Print vnstat's summary for an interface")]
    Dashboard { interface: String },

    /// List the interfaces vnstat keeps a database for
    #[command(about = "List interfaces known to vnstat")]
    List,

    /// Show the transfer accumulated in the current month
    #[command(about = "Show this month's transfer for an interface")]
    Usage { interface: String },
}

impl Cli {
    /// Applies command line flags on top of file/environment configuration
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(bin) = &self.vnstat_bin {
            config.vnstat_bin = bin.clone();
        }

        if let Commands::Serve {
            interface,
            limit,
            command,
            listen,
        } = &self.command
        {
            if let Some(interface) = interface {
                config.monitor.interface = interface.clone();
            }
            if let Some(limit) = limit {
                config.monitor.limit_gib = *limit;
            }
            if let Some(command) = command {
                config.monitor.command = command.clone();
            }
            if let Some(listen) = listen {
                config.listen_addr = listen.clone();
            }
        }
    }
}
