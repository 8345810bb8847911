use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::sync::Arc;

use vnstat_watcher::cli::{Cli, Commands};
use vnstat_watcher::collectors::vnstat::{StatsProvider, SystemCommandRunner, VnstatCollector};
use vnstat_watcher::config::AppConfig;
use vnstat_watcher::formatting::format_bytes;
use vnstat_watcher::monitor::{CommandActionRunner, LimitMonitor, spawn_monitor};
use vnstat_watcher::server::{self, AppState};
use vnstat_watcher::translator;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    cli.apply_overrides(&mut config);

    let collector = Arc::new(VnstatCollector::with_runner(
        config.vnstat_bin.clone(),
        config.dashboard_args.clone(),
        SystemCommandRunner,
    ));

    match cli.command {
        Commands::Serve { .. } => {
            let addr = config.listen_socket_addr()?;

            if let Some(monitor_config) = config.monitor_config()? {
                let monitor = LimitMonitor::new(monitor_config, collector.clone(), CommandActionRunner);
                spawn_monitor(monitor);
            } else {
                info!("No interface configured, bandwidth monitor disabled");
            }

            server::serve(addr, AppState::new(collector))
                .await
                .with_context(|| format!("HTTP server on {addr} failed"))?;
        }
        Commands::Report { interface, pretty } => {
            let record = collector
                .fetch_report(&interface)
                .await
                .with_context(|| format!("Failed to collect report for {interface}"))?;
            println!("{}", translator::serialize(&record, pretty)?);
        }
        Commands::Dashboard { interface } => {
            let text = collector
                .fetch_dashboard(&interface)
                .await
                .with_context(|| format!("Failed to collect dashboard for {interface}"))?;
            print!("{text}");
        }
        Commands::List => {
            for name in collector.list_interfaces().await.context("Failed to list interfaces")? {
                println!("{name}");
            }
        }
        Commands::Usage { interface } => {
            let used = collector
                .fetch_cumulative_monthly_transfer(&interface)
                .await
                .with_context(|| format!("Failed to read usage for {interface}"))?;
            println!("{interface}: {} this month", format_bytes(used));
        }
    }

    Ok(())
}
