use std::sync::Arc;

use anyhow::{Context, Result};
use futures::future::try_join_all;
use serde::Serialize;
use tokio::task::{self, JoinHandle};

use crate::{
    classifier::Classifier,
    config::ProcessingConfig,
    domain::{Classification, EmailRecord},
    infrastructure::shutdown::ShutdownListener,
    tasks::queue::InboxQueue,
};

const CHUNK_SIZE: usize = 64;

#[derive(Debug, Clone, Serialize)]
pub struct ClassifiedEmail {
    pub email: EmailRecord,
    pub classification: Classification,
}

#[derive(Debug, Default)]
pub struct ProcessingOutcome {
    pub classified: Vec<ClassifiedEmail>,
    pub skipped: usize,
}

pub struct InboxProcessor {
    queue: Arc<InboxQueue<EmailRecord>>,
    classifier: Classifier<'static>,
    config: ProcessingConfig,
}

impl InboxProcessor {
    pub fn new(
        queue: Arc<InboxQueue<EmailRecord>>,
        classifier: Classifier<'static>,
        config: ProcessingConfig,
    ) -> Self {
        Self {
            queue,
            classifier,
            config,
        }
    }

    pub fn spawn(self: Arc<Self>, shutdown: ShutdownListener) -> JoinHandle<Result<ProcessingOutcome>> {
        tokio::spawn(async move { self.run(&shutdown).await })
    }

    pub async fn run(&self, shutdown: &ShutdownListener) -> Result<ProcessingOutcome> {
        let batch = self.queue.drain_ordered();
        if batch.is_empty() {
            tracing::info!(target: "processor", "queue is empty; nothing to classify");
            return Ok(ProcessingOutcome::default());
        }
        tracing::info!(
            target: "processor",
            total = batch.len(),
            workers = self.config.worker_count,
            reclassify = self.config.reclassify,
            "processing batch"
        );
        self.handle_batch(batch, shutdown).await
    }

    async fn handle_batch(
        &self,
        batch: Vec<EmailRecord>,
        shutdown: &ShutdownListener,
    ) -> Result<ProcessingOutcome> {
        let total = batch.len();
        let mut outcome = ProcessingOutcome {
            classified: Vec::with_capacity(total),
            skipped: 0,
        };
        let mut pending = batch.into_iter().peekable();

        while pending.peek().is_some() {
            if shutdown.is_triggered() {
                outcome.skipped = total - outcome.classified.len();
                tracing::warn!(
                    target: "processor",
                    skipped = outcome.skipped,
                    reason = shutdown.reason().map(|r| r.as_str()).unwrap_or("unknown"),
                    "stopped early; leaving remaining mail unclassified"
                );
                break;
            }

            let round: Vec<Vec<EmailRecord>> = (0..self.config.worker_count)
                .map(|_| pending.by_ref().take(CHUNK_SIZE).collect::<Vec<_>>())
                .filter(|chunk| !chunk.is_empty())
                .collect();

            let workers = round.into_iter().map(|chunk| {
                let classifier = self.classifier;
                let reclassify = self.config.reclassify;
                task::spawn_blocking(move || classify_chunk(classifier, chunk, reclassify))
            });

            let results = try_join_all(workers)
                .await
                .context("classification worker panicked")?;
            for chunk in results {
                outcome.classified.extend(chunk);
            }
            tracing::debug!(
                target: "processor",
                done = outcome.classified.len(),
                total,
                "round finished"
            );
        }

        Ok(outcome)
    }
}

/// Classifies a chunk and writes each category back onto its record.
fn classify_chunk(
    classifier: Classifier<'static>,
    chunk: Vec<EmailRecord>,
    reclassify: bool,
) -> Vec<ClassifiedEmail> {
    chunk
        .into_iter()
        .map(|mut email| {
            let classification = if reclassify {
                classifier.score(&email)
            } else {
                classifier.explain(&email)
            };
            email.category = Some(classification.category);
            ClassifiedEmail {
                email,
                classification,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{Category, ClassificationReason},
        infrastructure::shutdown::{Shutdown, StopReason},
    };

    fn processor(emails: Vec<EmailRecord>, worker_count: usize, reclassify: bool) -> InboxProcessor {
        let queue = Arc::new(InboxQueue::new());
        for email in emails {
            queue.enqueue(email);
        }
        InboxProcessor::new(
            queue,
            Classifier::default(),
            ProcessingConfig {
                worker_count,
                reclassify,
            },
        )
    }

    #[tokio::test]
    async fn assigns_categories_and_keeps_preassigned() {
        let mut read_bill = EmailRecord::new("bill", "billing@bank.com", "Invoice", "");
        read_bill.read = true;
        let tagged = EmailRecord::new("tagged", "x@y.zz", "hello", "").with_category(Category::Travel);
        let unread = EmailRecord::new("plain", "x@y.zz", "hello", "hi there");

        let (_shutdown, listener) = Shutdown::new();
        let outcome = processor(vec![read_bill, tagged, unread], 2, false)
            .run(&listener)
            .await
            .unwrap();

        assert_eq!(outcome.skipped, 0);
        let ids: Vec<&str> = outcome.classified.iter().map(|c| c.email.id.as_str()).collect();
        assert_eq!(ids, vec!["tagged", "plain", "bill"]);

        let categories: Vec<Option<Category>> =
            outcome.classified.iter().map(|c| c.email.category).collect();
        assert_eq!(
            categories,
            vec![Some(Category::Travel), Some(Category::General), Some(Category::Bills)]
        );
        assert_eq!(
            outcome.classified[0].classification.reason,
            ClassificationReason::Preassigned
        );
    }

    #[tokio::test]
    async fn reclassify_overrides_stored_category() {
        let tagged =
            EmailRecord::new("1", "billing@bank.com", "Invoice", "").with_category(Category::Work);
        let (_shutdown, listener) = Shutdown::new();
        let outcome = processor(vec![tagged], 1, true).run(&listener).await.unwrap();
        assert_eq!(outcome.classified[0].email.category, Some(Category::Bills));
    }

    #[tokio::test]
    async fn large_batches_span_several_rounds() {
        let emails: Vec<EmailRecord> = (0..(CHUNK_SIZE * 3 + 5))
            .map(|i| EmailRecord::new(i.to_string(), "orders@amazon.com", "Your order", ""))
            .collect();
        let (_shutdown, listener) = Shutdown::new();
        let outcome = processor(emails, 2, false).run(&listener).await.unwrap();
        assert_eq!(outcome.classified.len(), CHUNK_SIZE * 3 + 5);
        assert!(outcome
            .classified
            .iter()
            .all(|c| c.email.category == Some(Category::Shopping)));
        assert_eq!(outcome.classified[0].email.id, "0");
    }

    #[tokio::test]
    async fn stops_when_shutdown_already_triggered() {
        let (shutdown, listener) = Shutdown::new();
        shutdown.trigger(StopReason::Interrupt);
        let emails = vec![EmailRecord::new("1", "x@y.zz", "hello", "")];
        let outcome = processor(emails, 1, false).run(&listener).await.unwrap();
        assert!(outcome.classified.is_empty());
        assert_eq!(outcome.skipped, 1);
    }

    #[tokio::test]
    async fn spawned_processor_returns_outcome() {
        let (_shutdown, listener) = Shutdown::new();
        let processor = Arc::new(processor(vec![], 1, false));
        let outcome = processor.spawn(listener).await.unwrap().unwrap();
        assert!(outcome.classified.is_empty());
    }
}
