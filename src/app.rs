use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;

use crate::{
    classifier::Classifier,
    config::AppConfig,
    domain::EmailRecord,
    inbox::{self, Report},
    infrastructure::{directories::ResolvedPaths, shutdown::Shutdown},
    tasks::{processor::InboxProcessor, queue::InboxQueue},
};

pub struct SorterApp {
    paths: ResolvedPaths,
    processor: Arc<InboxProcessor>,
    shutdown: Shutdown,
    config: Arc<AppConfig>,
}

impl SorterApp {
    pub async fn initialize(
        config: AppConfig,
        paths: ResolvedPaths,
        shutdown: Shutdown,
        classifier: Classifier<'static>,
    ) -> Result<Self> {
        let config = Arc::new(config);
        let queue: Arc<InboxQueue<EmailRecord>> = Arc::new(InboxQueue::new());

        let emails = inbox::load_inbox(&config.inbox_path)
            .await
            .with_context(|| format!("cannot read inbox {}", config.inbox_path.display()))?;
        for email in emails {
            queue.enqueue(email);
        }

        let snapshot = queue.snapshot();
        tracing::info!(
            target: "lifecycle",
            high = snapshot.high_priority,
            normal = snapshot.normal_priority,
            "inbox queued"
        );

        let processor = Arc::new(InboxProcessor::new(
            queue,
            classifier,
            config.processing.clone(),
        ));

        Ok(Self {
            paths,
            processor,
            shutdown,
            config,
        })
    }

    pub async fn run(self) -> Result<Report> {
        let SorterApp {
            paths,
            processor,
            shutdown,
            config,
        } = self;

        tracing::info!(target: "lifecycle", "inbox sorter started");

        let outcome = processor
            .spawn(shutdown.subscribe())
            .await
            .context("inbox processor task failed")??;

        let report = Report::build(outcome, Utc::now().with_timezone(&config.timezone));
        inbox::write_report(&paths.report_path, &report)
            .await
            .context("cannot write classification report")?;

        for (category, count) in &report.counts {
            tracing::info!(target: "lifecycle", category = %category, count, "category total");
        }
        tracing::info!(
            target: "lifecycle",
            total = report.total,
            skipped = report.skipped,
            report = %paths.report_path.display(),
            "inbox sorter finished"
        );
        Ok(report)
    }
}
