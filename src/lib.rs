//! vnstat watcher
//!
//! Turns vnstat traffic reports into JSON served over HTTP, and optionally
//! watches one interface's monthly transfer, running a command once a
//! configured limit is reached.

pub mod cli;
pub mod collectors;
pub mod config;
pub mod formatting;
pub mod models;
pub mod monitor;
pub mod server;
pub mod translator;
