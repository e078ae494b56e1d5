use crate::core::{Classification, DomainSet, ExpiryOutcome, ExpiryRecord, RegistrationLookup};
use crate::utils::error::{GemailsError, Result};
use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

/// Domains with fewer days than this left are expiring soon.
pub const EXPIRY_THRESHOLD_DAYS: f64 = 30.0;

// ASCII-only classes: a date in other digit scripts is not `YYYY-MM-DD`.
static EXPIRY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)(?:(expiration|expire|expiry)[^0-9A-Za-z_]*(date|time)[^0-9A-Za-z_]*[:\t\n\x0C\r ]+)",
        r"([0-9]{4}-[0-9]{2}-[0-9]{2})",
    ))
    .unwrap()
});

/// First `YYYY-MM-DD` value labelled as an expiration/expiry date or time.
///
/// `Ok(None)` when the record carries no such label. The pattern does not
/// check month and day ranges, so a match can still fail to parse.
pub fn extract_expiry_date(record: &str) -> Result<Option<NaiveDate>> {
    let Some(raw) = EXPIRY_RE
        .captures(record)
        .and_then(|caps| caps.get(3))
        .map(|m| m.as_str())
    else {
        return Ok(None);
    };

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(Some)
        .map_err(|source| GemailsError::DateParseError {
            value: raw.to_string(),
            source,
        })
}

/// Fractional days from `now` until midnight UTC of `expires_on`.
pub fn days_until(expires_on: NaiveDate, now: DateTime<Utc>) -> f64 {
    let expiry = expires_on.and_time(chrono::NaiveTime::MIN).and_utc();
    let remaining = expiry.signed_duration_since(now);
    remaining.num_seconds() as f64 / 3600.0 / 24.0
}

pub fn classify(days_remaining: f64) -> Classification {
    if days_remaining < EXPIRY_THRESHOLD_DAYS {
        Classification::ExpiringSoon
    } else {
        Classification::Valid
    }
}

/// Turns a registration record into an outcome without touching the network.
pub fn evaluate_record(domain: &str, record: &str, now: DateTime<Utc>) -> ExpiryOutcome {
    match extract_expiry_date(record) {
        Ok(Some(expires_on)) => {
            let days_remaining = days_until(expires_on, now);
            ExpiryOutcome::Classified {
                expires_on,
                days_remaining,
                classification: classify(days_remaining),
            }
        }
        Ok(None) => {
            tracing::warn!("No expiry date found for domain {}", domain);
            ExpiryOutcome::NoExpiryDate
        }
        Err(e) => {
            tracing::warn!("Error parsing expiry date for domain {}: {}", domain, e);
            let raw = match &e {
                GemailsError::DateParseError { value, .. } => value.clone(),
                other => other.to_string(),
            };
            ExpiryOutcome::UnparseableDate { raw }
        }
    }
}

/// Looks up and classifies domains one at a time.
pub struct ExpiryClassifier<L: RegistrationLookup> {
    lookup: L,
}

impl<L: RegistrationLookup> ExpiryClassifier<L> {
    pub fn new(lookup: L) -> Self {
        Self { lookup }
    }

    /// Never fails: lookup errors become `LookupFailed`.
    pub async fn check(&self, domain: &str, now: DateTime<Utc>) -> ExpiryRecord {
        let outcome = match self.lookup.lookup(domain).await {
            Ok(record) => evaluate_record(domain, &record, now),
            Err(e) => {
                tracing::warn!("Error fetching WHOIS info for domain {}: {}", domain, e);
                ExpiryOutcome::LookupFailed {
                    message: e.to_string(),
                }
            }
        };

        ExpiryRecord {
            domain: domain.to_string(),
            outcome,
        }
    }

    /// Checks every domain in sorted order, handing each record to `on_record`
    /// as soon as it is known.
    pub async fn check_all<F>(
        &self,
        domains: &DomainSet,
        now: DateTime<Utc>,
        mut on_record: F,
    ) -> Vec<ExpiryRecord>
    where
        F: FnMut(&ExpiryRecord),
    {
        let mut records = Vec::with_capacity(domains.len());
        for domain in domains.sorted() {
            let record = self.check(domain, now).await;
            on_record(&record);
            records.push(record);
        }
        records
    }
}
