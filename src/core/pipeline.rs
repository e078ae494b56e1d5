use crate::core::{Commit, DomainSet, EmailSet};

/// Substring after the first `@`, or `None` when there is no `@` or nothing
/// follows it.
pub fn extract_domain(email: &str) -> Option<&str> {
    match email.split_once('@') {
        Some((_, domain)) if !domain.is_empty() => Some(domain),
        _ => None,
    }
}

/// Deduplicates committer emails and the domains derived from them.
///
/// Feed it every commit of every repository; the sets only grow.
#[derive(Debug, Default)]
pub struct EmailPipeline {
    emails: EmailSet,
    domains: DomainSet,
}

impl EmailPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the committer email when this commit introduced it.
    pub fn ingest<'a>(&mut self, commit: &'a Commit) -> Option<&'a str> {
        let email = commit.committer_email();
        if email.is_empty() || !self.emails.insert(email) {
            return None;
        }

        if let Some(domain) = extract_domain(email) {
            if self.domains.insert(domain) {
                tracing::debug!("New domain: {}", domain);
            }
        }
        Some(email)
    }

    /// Returns how many new emails the batch contributed.
    pub fn ingest_all<'a, I>(&mut self, commits: I) -> usize
    where
        I: IntoIterator<Item = &'a Commit>,
    {
        commits
            .into_iter()
            .filter(|commit| self.ingest(commit).is_some())
            .count()
    }

    pub fn emails(&self) -> &EmailSet {
        &self.emails
    }

    pub fn domains(&self) -> &DomainSet {
        &self.domains
    }

    pub fn into_sets(self) -> (EmailSet, DomainSet) {
        (self.emails, self.domains)
    }
}
