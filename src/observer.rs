use std::sync::Arc;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::config::QueueConfig;
use crate::queue::{QueueStats, TranslationQueue};
use crate::record::{Translatable, TranslatableRecord};
use crate::service::{TranslationOutcome, TranslationService};

/// What the observer did with a saved record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveDispatch {
    /// The record asked not to be translated on this save
    Skipped,
    /// Handed to the background queue
    Queued(Uuid),
    /// Translated inline; `None` when translation failed and was logged
    Inline(Option<TranslationOutcome>),
}

/// Hook the host calls after every successful record save
pub struct SaveObserver {
    service: Arc<TranslationService>,
    queue: Option<TranslationQueue>,
}

impl SaveObserver {
    /// Starts the background queue when `queue.enabled` is set
    pub fn new(service: Arc<TranslationService>, config: &QueueConfig) -> Self {
        let queue = config
            .enabled
            .then(|| TranslationQueue::start(Arc::clone(&service), config.capacity));
        Self { service, queue }
    }

    pub fn is_queued(&self) -> bool {
        self.queue.is_some()
    }

    /// Translation never fails the save: every error is logged here and swallowed
    pub async fn saved(&self, record: &TranslatableRecord) -> SaveDispatch {
        if record.skip_translation() {
            debug!("Skipping translation for record {}", record.id());
            return SaveDispatch::Skipped;
        }

        if let Some(queue) = &self.queue {
            match queue.dispatch(record.clone()).await {
                Ok(job_id) => return SaveDispatch::Queued(job_id),
                Err(e) => {
                    warn!("Could not queue translation for record {}, running inline: {}", record.id(), e);
                }
            }
        }

        let mut record = record.clone();
        match self.service.handle_translation(&mut record).await {
            Ok(outcome) => SaveDispatch::Inline(Some(outcome)),
            Err(e) if e.is_soft_skip() => {
                warn!("Auto translation skipped for record {}: {}", record.id(), e);
                SaveDispatch::Inline(None)
            }
            Err(e) => {
                error!("Auto translation failed for record {}: {}", record.id(), e);
                SaveDispatch::Inline(None)
            }
        }
    }

    /// Drain the queue, if any
    pub async fn shutdown(self) -> Option<QueueStats> {
        match self.queue {
            Some(queue) => Some(queue.shutdown().await),
            None => None,
        }
    }
}
