// Adapters layer: concrete implementations of the domain ports (GitHub, WHOIS, local files).

pub mod github;
pub mod storage;
pub mod whois;

pub use github::GitHubClient;
pub use storage::LocalStorage;
pub use whois::WhoisClient;
