use clap::Parser;
use serde::{Deserialize, Serialize};

/// Collect committer emails from GitHub repositories and flag email domains
/// that are about to expire.
///
/// Only the first page of repositories and of each repository's commits is read.
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "gemails", version)]
#[command(about = "Collect committer emails from GitHub and check their domains' expiry")]
pub struct CliConfig {
    /// GitHub username or organization
    #[arg(short = 'u', long = "user")]
    pub user: String,

    /// GitHub API token
    #[arg(short = 't', long = "token")]
    #[serde(skip_serializing)]
    pub token: String,

    /// Output file for unique emails [default: emails.txt]
    #[arg(short = 'o', long = "output")]
    pub output: Option<String>,

    /// Process only this repository instead of listing all of them
    #[arg(short = 'r', long = "repo")]
    pub repo: Option<String>,

    /// TOML settings file
    #[arg(short = 'c', long = "config")]
    pub config: Option<String>,

    /// GitHub API base URL [default: https://api.github.com]
    #[arg(long)]
    pub api_base_url: Option<String>,

    /// Root WHOIS server [default: whois.iana.org]
    #[arg(long)]
    pub whois_server: Option<String>,

    /// Timeout in seconds for each GitHub request [default: 30]
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Print each newly discovered email
    #[arg(long)]
    pub show_emails: bool,

    /// Skip the WHOIS domain expiry checks
    #[arg(long)]
    pub skip_expiry: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
