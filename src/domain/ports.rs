use crate::domain::model::{Commit, Repository};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn user(&self) -> &str;
    fn token(&self) -> &str;
    fn output_path(&self) -> &str;
    fn repository(&self) -> Option<&str>;
    fn api_base_url(&self) -> &str;
    fn http_timeout(&self) -> Duration;
    fn whois_server(&self) -> &str;
    fn whois_timeout(&self) -> Duration;
}

/// Where repositories and their commits come from.
#[async_trait]
pub trait RepositoryHost: Send + Sync {
    async fn list_repositories(&self, account: &str) -> Result<Vec<Repository>>;
    async fn list_commits(&self, account: &str, repository: &str) -> Result<Vec<Commit>>;
}

/// Returns the free-text registration record of a domain.
#[async_trait]
pub trait RegistrationLookup: Send + Sync {
    async fn lookup(&self, domain: &str) -> Result<String>;
}
