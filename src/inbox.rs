use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use chrono::{DateTime, SecondsFormat};
use chrono_tz::Tz;
use serde::Serialize;
use thiserror::Error;

use crate::{
    domain::{Category, Classification, EmailRecord},
    presentation::Badge,
    tasks::processor::ProcessingOutcome,
};

#[derive(Debug, Error)]
pub enum InboxError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse inbox {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode report: {0}")]
    Encode(#[from] serde_json::Error),
}

pub async fn load_inbox(path: &Path) -> Result<Vec<EmailRecord>, InboxError> {
    let raw = tokio::fs::read(path).await.map_err(|source| InboxError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let emails: Vec<EmailRecord> =
        serde_json::from_slice(&raw).map_err(|source| InboxError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    tracing::info!(
        target: "inbox",
        path = %path.display(),
        total = emails.len(),
        "inbox loaded"
    );
    Ok(emails)
}

#[derive(Debug, Serialize)]
pub struct ReportEntry {
    pub email: EmailRecord,
    pub classification: Classification,
    pub badge: Badge,
}

#[derive(Debug, Serialize)]
pub struct Report {
    pub generated_at: String,
    pub total: usize,
    pub skipped: usize,
    pub counts: BTreeMap<Category, usize>,
    pub emails: Vec<ReportEntry>,
}

impl Report {
    pub fn build(outcome: ProcessingOutcome, generated_at: DateTime<Tz>) -> Self {
        let mut counts = BTreeMap::new();
        let emails: Vec<ReportEntry> = outcome
            .classified
            .into_iter()
            .map(|item| {
                let category = item.classification.category;
                *counts.entry(category).or_insert(0) += 1;
                ReportEntry {
                    email: item.email,
                    classification: item.classification,
                    badge: Badge::for_category(category),
                }
            })
            .collect();

        Self {
            generated_at: generated_at.to_rfc3339_opts(SecondsFormat::Secs, false),
            total: emails.len() + outcome.skipped,
            skipped: outcome.skipped,
            counts,
            emails,
        }
    }
}

pub async fn write_report(path: &Path, report: &Report) -> Result<(), InboxError> {
    let encoded = serde_json::to_vec_pretty(report)?;
    tokio::fs::write(path, encoded)
        .await
        .map_err(|source| InboxError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    tracing::info!(
        target: "inbox",
        path = %path.display(),
        classified = report.emails.len(),
        skipped = report.skipped,
        "report written"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::{classifier::Classifier, tasks::processor::ClassifiedEmail};

    fn classified(email: EmailRecord) -> ClassifiedEmail {
        let classification = Classifier::default().explain(&email);
        let mut email = email;
        email.category = Some(classification.category);
        ClassifiedEmail {
            email,
            classification,
        }
    }

    #[tokio::test]
    async fn loads_inbox_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inbox.json");
        std::fs::write(
            &path,
            r#"[
                {"id": "1", "sender": "billing@bank.com", "subject": "Invoice"},
                {"id": "2", "sender": "x@y.zz", "category": "personal", "read": true}
            ]"#,
        )
        .unwrap();

        let emails = load_inbox(&path).await.unwrap();
        assert_eq!(emails.len(), 2);
        assert_eq!(emails[1].category, Some(Category::Personal));
    }

    #[tokio::test]
    async fn reports_parse_and_io_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(load_inbox(&missing).await, Err(InboxError::Io { .. })));

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{not json").unwrap();
        assert!(matches!(load_inbox(&broken).await, Err(InboxError::Parse { .. })));
    }

    #[tokio::test]
    async fn report_counts_and_badges() {
        let outcome = ProcessingOutcome {
            classified: vec![
                classified(EmailRecord::new("1", "billing@bank.com", "Invoice", "")),
                classified(EmailRecord::new("2", "x@y.zz", "hello", "hi there")),
                classified(EmailRecord::new("3", "payments@bank.com", "Statement", "")),
            ],
            skipped: 2,
        };
        let at = chrono_tz::America::Sao_Paulo
            .with_ymd_and_hms(2024, 3, 1, 9, 30, 0)
            .unwrap();
        let report = Report::build(outcome, at);

        assert_eq!(report.generated_at, "2024-03-01T09:30:00-03:00");
        assert_eq!(report.total, 5);
        assert_eq!(report.counts.get(&Category::Bills), Some(&2));
        assert_eq!(report.counts.get(&Category::General), Some(&1));
        assert_eq!(report.emails[1].badge.colors.bg, "bg-slate-100");

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        write_report(&path, &report).await.unwrap();
        let written: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(written["counts"]["bills"], 2);
        assert_eq!(written["emails"][0]["email"]["category"], "bills");
        assert_eq!(written["emails"][0]["classification"]["reason"], "threshold");
        assert_eq!(written["emails"][0]["badge"]["info"]["name"], "Bills");
    }
}
