//! Collects committer emails from a GitHub account's repositories and checks
//! the WHOIS expiry date of every email domain.

pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{GitHubClient, LocalStorage, WhoisClient};
pub use config::{cli::CliConfig, Settings};
pub use core::engine::{HarvestEngine, RunOptions};
pub use core::report::ConsoleReporter;
pub use utils::error::{GemailsError, Result};
