pub mod engine;
pub mod expiry;
pub mod pipeline;
pub mod report;

pub use crate::domain::model::{
    Classification, Commit, DomainSet, EmailSet, ExpiryOutcome, ExpiryRecord, Repository,
    RunSummary,
};
pub use crate::domain::ports::{ConfigProvider, RegistrationLookup, RepositoryHost, Storage};
pub use crate::utils::error::Result;
