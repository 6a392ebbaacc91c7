use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::config::{Config, TranslatorConfig};
use crate::error::Result;
use crate::filler::TranslationFiller;
use crate::locale::LocaleSet;
use crate::record::{Translatable, TranslatableRecord};
use crate::store::RecordStore;
use crate::translate::{ApiKeySource, Translator, TranslatorFactory};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationOutcome {
    /// The record opted out of automatic translation
    Skipped,
    /// Nothing was missing, or every attempted call failed
    Unchanged { failed: usize },
    /// New entries were filled and the record was saved
    Translated { filled: usize, failed: usize },
}

enum TranslatorSource {
    Injected(Arc<dyn Translator>),
    Lazy {
        config: TranslatorConfig,
        key_source: Box<dyn ApiKeySource>,
        cached: Mutex<Option<Arc<dyn Translator>>>,
    },
}

/// Runs the fill pass for a record and writes the result back through the store
pub struct TranslationService {
    locales: LocaleSet,
    translator: TranslatorSource,
    store: Arc<dyn RecordStore>,
}

impl TranslationService {
    /// Service that builds its DeepL translator on first use
    pub fn new(config: &Config, key_source: Box<dyn ApiKeySource>, store: Arc<dyn RecordStore>) -> Self {
        let locales = LocaleSet::from_config(&config.locales);
        if locales.is_empty() {
            warn!("TranslationService initialized without supported languages");
        } else {
            info!("TranslationService initialized with languages: {}", locales.iter().collect::<Vec<_>>().join(", "));
        }

        Self {
            locales,
            translator: TranslatorSource::Lazy {
                config: config.translator.clone(),
                key_source,
                cached: Mutex::new(None),
            },
            store,
        }
    }

    /// Service around a translator owned by the host
    pub fn with_translator(locales: LocaleSet, translator: Arc<dyn Translator>, store: Arc<dyn RecordStore>) -> Self {
        Self {
            locales,
            translator: TranslatorSource::Injected(translator),
            store,
        }
    }

    /// The translator, built once; a failed build is retried on the next call
    async fn translator(&self) -> Result<Arc<dyn Translator>> {
        match &self.translator {
            TranslatorSource::Injected(translator) => Ok(Arc::clone(translator)),
            TranslatorSource::Lazy { config, key_source, cached } => {
                let mut cached = cached.lock().await;
                if let Some(translator) = cached.as_ref() {
                    return Ok(Arc::clone(translator));
                }
                let translator: Arc<dyn Translator> =
                    Arc::from(TranslatorFactory::create_translator(config, key_source.as_ref())?);
                *cached = Some(Arc::clone(&translator));
                Ok(translator)
            }
        }
    }

    /// Fill missing translations of `record` and persist it when anything was added
    pub async fn handle_translation(&self, record: &mut TranslatableRecord) -> Result<TranslationOutcome> {
        info!("Starting translation process for record {}", record.id());

        if !record.should_auto_translate() {
            info!("Record {} has automatic translation disabled", record.id());
            return Ok(TranslationOutcome::Skipped);
        }

        let translator = match self.translator().await {
            Ok(translator) => translator,
            Err(e) => {
                warn!("Translation process aborted for record {}: {}", record.id(), e);
                return Err(e);
            }
        };

        let result = TranslationFiller::fill(&*record, &self.locales, translator.as_ref()).await?;
        let failed = result.failed.len();

        if !result.changed {
            return Ok(TranslationOutcome::Unchanged { failed });
        }

        for (field, locale) in &result.filled {
            if let Some(text) = result.translations.get(field).and_then(|l| l.get(locale)) {
                record.set_translation(field, locale, text.clone());
            }
        }

        if let Err(e) = self.store.save(record).await {
            error!("Failed to save record {}: {}", record.id(), e);
            return Err(e);
        }
        info!("Record {} saved successfully with new translations", record.id());

        Ok(TranslationOutcome::Translated {
            filled: result.filled.len(),
            failed,
        })
    }

    /// Load a record by id, then run `handle_translation` on it
    pub async fn translate_by_id(&self, id: &str) -> Result<(TranslatableRecord, TranslationOutcome)> {
        let mut record = self.store.load(id).await?;
        let outcome = self.handle_translation(&mut record).await?;
        Ok((record, outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AutoTranslateError;
    use crate::store::MockRecordStore;
    use crate::translate::{MockTranslator, StaticApiKey};

    fn echo_translator() -> Arc<dyn Translator> {
        let mut translator = MockTranslator::new();
        translator
            .expect_translate()
            .returning(|text, locale| Ok(format!("{} [{}]", text, locale)));
        Arc::new(translator)
    }

    fn post() -> TranslatableRecord {
        TranslatableRecord::new("post-1", "en", ["title"]).with_translation("title", "en", "Hello")
    }

    #[tokio::test]
    async fn test_translated_record_is_saved() {
        let mut store = MockRecordStore::new();
        store
            .expect_save()
            .withf(|record| record.translation("title", "fr") == Some("Hello [fr]"))
            .times(1)
            .returning(|_| Ok(()));

        let service = TranslationService::with_translator(
            LocaleSet::new(["en", "fr", "de"]),
            echo_translator(),
            Arc::new(store),
        );

        let mut record = post();
        let outcome = service.handle_translation(&mut record).await.unwrap();

        assert_eq!(outcome, TranslationOutcome::Translated { filled: 2, failed: 0 });
        assert_eq!(record.translation("title", "de"), Some("Hello [de]"));
    }

    #[tokio::test]
    async fn test_unchanged_record_is_not_saved() {
        let mut store = MockRecordStore::new();
        store.expect_save().never();

        let service = TranslationService::with_translator(LocaleSet::new(["en"]), echo_translator(), Arc::new(store));

        let mut record = post();
        let outcome = service.handle_translation(&mut record).await.unwrap();
        assert_eq!(outcome, TranslationOutcome::Unchanged { failed: 0 });
    }

    #[tokio::test]
    async fn test_opted_out_record_is_skipped() {
        let mut store = MockRecordStore::new();
        store.expect_save().never();
        let mut translator = MockTranslator::new();
        translator.expect_translate().never();

        let service = TranslationService::with_translator(
            LocaleSet::new(["en", "fr"]),
            Arc::new(translator),
            Arc::new(store),
        );

        let mut record = post();
        record.auto_translate = false;
        assert_eq!(service.handle_translation(&mut record).await.unwrap(), TranslationOutcome::Skipped);
    }

    #[tokio::test]
    async fn test_persistence_error_propagates() {
        let mut store = MockRecordStore::new();
        store
            .expect_save()
            .returning(|_| Err(AutoTranslateError::Persistence("disk full".to_string())));

        let service = TranslationService::with_translator(LocaleSet::new(["en", "fr"]), echo_translator(), Arc::new(store));

        let mut record = post();
        let result = service.handle_translation(&mut record).await;
        assert!(matches!(result, Err(AutoTranslateError::Persistence(msg)) if msg == "disk full"));
    }

    #[tokio::test]
    async fn test_missing_api_key_is_unavailable() {
        let mut store = MockRecordStore::new();
        store.expect_save().never();

        let config = Config::default();
        let service = TranslationService::new(&config, Box::new(StaticApiKey(None)), Arc::new(store));

        let mut record = post();
        let result = service.handle_translation(&mut record).await;
        assert!(matches!(result, Err(AutoTranslateError::TranslatorUnavailable(_))));
    }

    #[tokio::test]
    async fn test_translate_by_id_loads_first() {
        let mut store = MockRecordStore::new();
        store.expect_load().with(mockall::predicate::eq("post-1")).returning(|_| Ok(post()));
        store.expect_save().times(1).returning(|_| Ok(()));

        let service = TranslationService::with_translator(LocaleSet::new(["en", "fr"]), echo_translator(), Arc::new(store));

        let (record, outcome) = service.translate_by_id("post-1").await.unwrap();
        assert_eq!(outcome, TranslationOutcome::Translated { filled: 1, failed: 0 });
        assert_eq!(record.translation("title", "fr"), Some("Hello [fr]"));
    }
}
