use thiserror::Error;

#[derive(Error, Debug)]
pub enum GemailsError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("GitHub API returned status code {status} for URL {url}")]
    StatusError { status: u16, url: String },

    #[error("Failed to decode {context}: {source}")]
    DecodeError {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("WHOIS lookup for {domain} failed: {message}")]
    WhoisError { domain: String, message: String },

    #[error("Invalid expiry date '{value}': {source}")]
    DateParseError {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Config file error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Api,
    Data,
    Storage,
    Configuration,
}

impl GemailsError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            GemailsError::HttpError(_) | GemailsError::WhoisError { .. } => ErrorCategory::Network,
            GemailsError::StatusError { .. } => ErrorCategory::Api,
            GemailsError::DecodeError { .. } | GemailsError::DateParseError { .. } => {
                ErrorCategory::Data
            }
            GemailsError::IoError(_) => ErrorCategory::Storage,
            GemailsError::TomlError(_)
            | GemailsError::ConfigError { .. }
            | GemailsError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            GemailsError::StatusError { status: 401, url } => {
                format!("GitHub rejected the token (401) for {}", url)
            }
            GemailsError::StatusError { status: 404, url } => {
                format!("GitHub could not find {} (404)", url)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            GemailsError::StatusError { status: 401, .. }
            | GemailsError::StatusError { status: 403, .. } => {
                "Check that the token passed with -t is valid and has repo read access"
            }
            GemailsError::StatusError { status: 404, .. } => {
                "Check the account passed with -u and the repository passed with -r"
            }
            GemailsError::StatusError { .. } => "Retry later; the GitHub API may be degraded",
            GemailsError::HttpError(_) => "Check network connectivity and the API base URL",
            GemailsError::IoError(_) => "Check that the output path is writable",
            GemailsError::DecodeError { .. } => {
                "The API answered with an unexpected body; check the API base URL"
            }
            GemailsError::WhoisError { .. } | GemailsError::DateParseError { .. } => {
                "WHOIS data varies by registry; the domain can be checked manually"
            }
            GemailsError::ConfigError { .. } => {
                "Check that the file passed with -c exists and is readable"
            }
            GemailsError::TomlError(_) | GemailsError::InvalidConfigValueError { .. } => {
                "Fix the command line flags or the config file and run again"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, GemailsError>;
