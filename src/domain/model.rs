use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Only the name is read from the repository listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
}

impl Repository {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// One entry of the commit listing, reduced to `commit.committer.email`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Commit {
    #[serde(default)]
    pub commit: CommitDetails,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommitDetails {
    #[serde(default)]
    pub committer: Option<Signature>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Signature {
    #[serde(default)]
    pub email: Option<String>,
}

impl Commit {
    pub fn with_committer_email(email: impl Into<String>) -> Self {
        Self {
            commit: CommitDetails {
                committer: Some(Signature {
                    email: Some(email.into()),
                }),
            },
        }
    }

    /// Empty when the commit carries no committer identity.
    pub fn committer_email(&self) -> &str {
        self.commit
            .committer
            .as_ref()
            .and_then(|c| c.email.as_deref())
            .unwrap_or("")
    }
}

/// Distinct committer emails, compared by exact string equality.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmailSet {
    emails: HashSet<String>,
}

impl EmailSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when the email was not present before.
    pub fn insert(&mut self, email: &str) -> bool {
        if self.emails.contains(email) {
            return false;
        }
        self.emails.insert(email.to_string())
    }

    pub fn contains(&self, email: &str) -> bool {
        self.emails.contains(email)
    }

    pub fn len(&self) -> usize {
        self.emails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.emails.iter().map(String::as_str)
    }

    pub fn sorted(&self) -> Vec<&str> {
        let mut emails: Vec<&str> = self.iter().collect();
        emails.sort_unstable();
        emails
    }
}

/// Distinct email domains.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainSet {
    domains: HashSet<String>,
}

impl DomainSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, domain: &str) -> bool {
        if self.domains.contains(domain) {
            return false;
        }
        self.domains.insert(domain.to_string())
    }

    pub fn contains(&self, domain: &str) -> bool {
        self.domains.contains(domain)
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.domains.iter().map(String::as_str)
    }

    pub fn sorted(&self) -> Vec<&str> {
        let mut domains: Vec<&str> = self.iter().collect();
        domains.sort_unstable();
        domains
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    ExpiringSoon,
    Valid,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExpiryOutcome {
    Classified {
        expires_on: NaiveDate,
        /// Fractional days; negative once the date has passed.
        days_remaining: f64,
        classification: Classification,
    },
    NoExpiryDate,
    UnparseableDate { raw: String },
    LookupFailed { message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpiryRecord {
    pub domain: String,
    pub outcome: ExpiryOutcome,
}

impl ExpiryRecord {
    pub fn classification(&self) -> Option<Classification> {
        match self.outcome {
            ExpiryOutcome::Classified { classification, .. } => Some(classification),
            _ => None,
        }
    }
}

/// What a run produced, for the final log line and for tests.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub repositories: usize,
    pub emails: EmailSet,
    pub domains: DomainSet,
    pub expiry: Vec<ExpiryRecord>,
}
