use crate::core::expiry::ExpiryClassifier;
use crate::core::pipeline::EmailPipeline;
use crate::core::report::ConsoleReporter;
use crate::core::{
    ConfigProvider, RegistrationLookup, Repository, RepositoryHost, RunSummary, Storage,
};
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use std::io::Write;

#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    /// Print each email the first time it is seen.
    pub show_emails: bool,
    pub check_expiry: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            show_emails: false,
            check_expiry: true,
        }
    }
}

/// Drives one run: repositories, commits, email file, then domain expiry.
pub struct HarvestEngine<H, L, S, C>
where
    H: RepositoryHost,
    L: RegistrationLookup,
    S: Storage,
    C: ConfigProvider,
{
    host: H,
    classifier: ExpiryClassifier<L>,
    storage: S,
    config: C,
    reporter: ConsoleReporter,
    options: RunOptions,
}

impl<H, L, S, C> HarvestEngine<H, L, S, C>
where
    H: RepositoryHost,
    L: RegistrationLookup,
    S: Storage,
    C: ConfigProvider,
{
    pub fn new(host: H, lookup: L, storage: S, config: C) -> Self {
        Self {
            host,
            classifier: ExpiryClassifier::new(lookup),
            storage,
            config,
            reporter: ConsoleReporter::new(),
            options: RunOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_reporter(mut self, reporter: ConsoleReporter) -> Self {
        self.reporter = reporter;
        self
    }

    pub async fn run(&self) -> Result<RunSummary> {
        self.run_with_output(&mut std::io::stdout(), Utc::now()).await
    }

    pub async fn run_with_output<W: Write>(
        &self,
        out: &mut W,
        now: DateTime<Utc>,
    ) -> Result<RunSummary> {
        let account = self.config.user();
        let repositories = self.repositories().await?;
        tracing::info!("Found {} repositories for {}", repositories.len(), account);

        let mut pipeline = EmailPipeline::new();
        for repository in &repositories {
            self.reporter.repository(out, &repository.name)?;
            let commits = self.host.list_commits(account, &repository.name).await?;
            tracing::debug!("{}: {} commits", repository.name, commits.len());

            for commit in &commits {
                if let Some(email) = pipeline.ingest(commit) {
                    if self.options.show_emails {
                        self.reporter.new_email(out, email)?;
                    }
                }
            }
        }

        let (emails, domains) = pipeline.into_sets();

        let mut contents = String::new();
        for email in emails.sorted() {
            contents.push_str(email);
            contents.push('\n');
        }
        let output_path = self.config.output_path();
        self.storage
            .write_file(output_path, contents.as_bytes())
            .await?;
        self.reporter.saved(out, output_path)?;

        let expiry = if self.options.check_expiry {
            let mut write_result = Ok(());
            let records = self
                .classifier
                .check_all(&domains, now, |record| {
                    if write_result.is_ok() {
                        write_result = self.reporter.expiry(out, record);
                    }
                })
                .await;
            write_result?;
            records
        } else {
            tracing::info!("Skipping domain expiry checks");
            Vec::new()
        };

        tracing::info!(
            "Processed {} repositories: {} unique emails, {} domains, {} classified",
            repositories.len(),
            emails.len(),
            domains.len(),
            expiry.iter().filter(|r| r.classification().is_some()).count()
        );

        Ok(RunSummary {
            repositories: repositories.len(),
            emails,
            domains,
            expiry,
        })
    }

    async fn repositories(&self) -> Result<Vec<Repository>> {
        match self.config.repository() {
            Some(name) => Ok(vec![Repository::named(name)]),
            None => self.host.list_repositories(self.config.user()).await,
        }
    }
}
