pub mod cli;
pub mod toml_config;

use crate::adapters::github::DEFAULT_API_BASE_URL;
use crate::adapters::whois::DEFAULT_WHOIS_SERVER;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty, validate_path, validate_path_segment, validate_range, validate_url,
    Validate,
};
use cli::CliConfig;
use std::time::Duration;
use toml_config::TomlConfig;

pub const DEFAULT_OUTPUT_PATH: &str = "emails.txt";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_WHOIS_TIMEOUT_SECS: u64 = 10;

/// Effective settings: command line first, then the config file, then defaults.
#[derive(Clone)]
pub struct Settings {
    pub user: String,
    pub token: String,
    pub output_path: String,
    pub repository: Option<String>,
    pub api_base_url: String,
    pub http_timeout_secs: u64,
    pub whois_server: String,
    pub whois_timeout_secs: u64,
}

impl Settings {
    pub fn resolve(cli: &CliConfig, file: Option<&TomlConfig>) -> Self {
        let file = file.cloned().unwrap_or_default();

        Self {
            user: cli.user.clone(),
            token: cli.token.clone(),
            output_path: cli
                .output
                .clone()
                .or(file.output.path)
                .unwrap_or_else(|| DEFAULT_OUTPUT_PATH.to_string()),
            repository: cli.repo.clone().filter(|r| !r.is_empty()),
            api_base_url: cli
                .api_base_url
                .clone()
                .or(file.github.api_base_url)
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            http_timeout_secs: cli
                .timeout_secs
                .or(file.github.timeout_seconds)
                .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS),
            whois_server: cli
                .whois_server
                .clone()
                .or(file.whois.server)
                .unwrap_or_else(|| DEFAULT_WHOIS_SERVER.to_string()),
            whois_timeout_secs: file
                .whois
                .timeout_seconds
                .unwrap_or(DEFAULT_WHOIS_TIMEOUT_SECS),
        }
    }

    /// Loads the `--config` file when one was given.
    pub fn from_cli(cli: &CliConfig) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => {
                let file = TomlConfig::from_file(path)?;
                file.validate()?;
                Some(file)
            }
            None => None,
        };
        Ok(Self::resolve(cli, file.as_ref()))
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("user", &self.user)
            .field("token", &"<redacted>")
            .field("output_path", &self.output_path)
            .field("repository", &self.repository)
            .field("api_base_url", &self.api_base_url)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("whois_server", &self.whois_server)
            .field("whois_timeout_secs", &self.whois_timeout_secs)
            .finish()
    }
}

impl ConfigProvider for Settings {
    fn user(&self) -> &str {
        &self.user
    }

    fn token(&self) -> &str {
        &self.token
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn repository(&self) -> Option<&str> {
        self.repository.as_deref()
    }

    fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    fn whois_server(&self) -> &str {
        &self.whois_server
    }

    fn whois_timeout(&self) -> Duration {
        Duration::from_secs(self.whois_timeout_secs)
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_path_segment("user", &self.user)?;
        validate_non_empty("token", &self.token)?;
        if let Some(repo) = &self.repository {
            validate_path_segment("repo", repo)?;
        }
        validate_path("output", &self.output_path)?;
        validate_url("api_base_url", &self.api_base_url)?;
        validate_range("timeout_secs", self.http_timeout_secs, 1, 600)?;
        validate_path_segment("whois_server", &self.whois_server)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> CliConfig {
        let mut full = vec!["gemails", "-u", "octo", "-t", "secret"];
        full.extend_from_slice(args);
        CliConfig::try_parse_from(full).unwrap()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::resolve(&cli(&[]), None);
        assert_eq!(settings.output_path, "emails.txt");
        assert_eq!(settings.api_base_url, "https://api.github.com");
        assert_eq!(settings.whois_server, "whois.iana.org");
        assert_eq!(settings.http_timeout(), Duration::from_secs(30));
        assert_eq!(settings.whois_timeout(), Duration::from_secs(10));
        assert_eq!(settings.repository(), None);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_cli_overrides_file_and_file_overrides_defaults() {
        let file = TomlConfig::from_toml_str(
            r#"
[github]
api_base_url = "https://ghe.example.com/api/v3"
timeout_seconds = 12

[output]
path = "from-file.txt"
"#,
        )
        .unwrap();

        let settings = Settings::resolve(&cli(&["-o", "from-cli.txt"]), Some(&file));
        assert_eq!(settings.output_path, "from-cli.txt");
        assert_eq!(settings.api_base_url, "https://ghe.example.com/api/v3");
        assert_eq!(settings.http_timeout_secs, 12);
    }

    #[test]
    fn test_empty_repo_means_all_repositories() {
        let settings = Settings::resolve(&cli(&["-r", ""]), None);
        assert_eq!(settings.repository(), None);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut settings = Settings::resolve(&cli(&[]), None);
        settings.user = "   ".to_string();
        assert!(settings.validate().is_err());

        let settings = Settings::resolve(&cli(&["-r", "a/b"]), None);
        assert!(settings.validate().is_err());

        let settings = Settings::resolve(&cli(&["--api-base-url", "ftp://x"]), None);
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_token() {
        let settings = Settings::resolve(&cli(&[]), None);
        let rendered = format!("{:?}", settings);
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_unreadable_config_file_fails_before_resolving() {
        let err = Settings::from_cli(&cli(&["-c", "/nonexistent/gemails.toml"])).unwrap_err();
        assert!(matches!(
            err,
            crate::utils::error::GemailsError::ConfigError { ref message }
                if message.contains("/nonexistent/gemails.toml")
        ));
    }
}
