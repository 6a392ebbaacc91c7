use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::{AutoTranslateError, Result};
use crate::record::TranslatableRecord;
use crate::service::{TranslationOutcome, TranslationService};

/// One queued translation of a saved record
#[derive(Debug, Clone)]
pub struct TranslationJob {
    pub id: Uuid,
    pub record: TranslatableRecord,
    pub queued_at: DateTime<Utc>,
}

impl TranslationJob {
    pub fn new(record: TranslatableRecord) -> Self {
        Self {
            id: Uuid::new_v4(),
            record,
            queued_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueueStats {
    pub processed: usize,
    pub translated: usize,
    pub unchanged: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Background worker running translation jobs one at a time
pub struct TranslationQueue {
    sender: mpsc::Sender<TranslationJob>,
    worker: JoinHandle<QueueStats>,
}

impl TranslationQueue {
    /// Spawn the worker on the current tokio runtime
    pub fn start(service: Arc<TranslationService>, capacity: usize) -> Self {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let worker = tokio::spawn(run_worker(service, receiver));
        info!("Translation queue started (capacity {})", capacity.max(1));
        Self { sender, worker }
    }

    pub async fn dispatch(&self, record: TranslatableRecord) -> Result<Uuid> {
        let job = TranslationJob::new(record);
        let id = job.id;
        info!("Queueing translation job {} for record {}", id, job.record.id);

        self.sender
            .send(job)
            .await
            .map_err(|_| AutoTranslateError::QueueClosed)?;
        Ok(id)
    }

    /// Stop accepting jobs and wait for the pending ones to finish
    pub async fn shutdown(self) -> QueueStats {
        drop(self.sender);
        match self.worker.await {
            Ok(stats) => {
                info!("Translation queue drained: {:?}", stats);
                stats
            }
            Err(e) => {
                error!("Translation worker terminated abnormally: {}", e);
                QueueStats::default()
            }
        }
    }
}

async fn run_worker(service: Arc<TranslationService>, mut receiver: mpsc::Receiver<TranslationJob>) -> QueueStats {
    let mut stats = QueueStats::default();

    while let Some(mut job) = receiver.recv().await {
        let waited = Utc::now().signed_duration_since(job.queued_at);
        info!("Running translation job {} (queued {} ms)", job.id, waited.num_milliseconds());

        stats.processed += 1;
        match service.handle_translation(&mut job.record).await {
            Ok(TranslationOutcome::Translated { .. }) => stats.translated += 1,
            Ok(TranslationOutcome::Unchanged { .. }) => stats.unchanged += 1,
            Ok(TranslationOutcome::Skipped) => stats.skipped += 1,
            Err(e) if e.is_soft_skip() => {
                warn!("Translation job {} skipped: {}", job.id, e);
                stats.skipped += 1;
            }
            Err(e) => {
                error!("Translation job {} failed for record {}: {}", job.id, job.record.id, e);
                stats.failed += 1;
            }
        }
    }

    stats
}
