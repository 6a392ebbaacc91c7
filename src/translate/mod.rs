// Translation provider plumbing
//
// The filler only ever sees the `Translator` trait; everything provider
// specific lives behind it:
// - deepl: DeepL REST adapter
// - credentials: API key sources (config value, environment, chain)

pub mod credentials;
pub mod deepl;

use async_trait::async_trait;
use tracing::{error, info};

pub use credentials::{ApiKeySource, ChainedApiKey, EnvApiKey, StaticApiKey};
pub use deepl::DeepLTranslator;
use crate::config::TranslatorConfig;
use crate::error::{AutoTranslateError, Result};

/// Capability to translate one text into one target locale
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` into `target_locale`, the source language is detected by the provider
    async fn translate(&self, text: &str, target_locale: &str) -> Result<String>;
}

/// Factory for creating translator instances
pub struct TranslatorFactory;

impl TranslatorFactory {
    /// Build the DeepL translator, failing with `TranslatorUnavailable` when no key is configured
    pub fn create_translator(
        config: &TranslatorConfig,
        key_source: &dyn ApiKeySource,
    ) -> Result<Box<dyn Translator>> {
        Ok(Box::new(Self::create_deepl(config, key_source)?))
    }

    pub fn create_deepl(
        config: &TranslatorConfig,
        key_source: &dyn ApiKeySource,
    ) -> Result<DeepLTranslator> {
        info!("Starting translator initialization");

        let Some(api_key) = key_source.get_api_key() else {
            error!("DeepL API key is empty or not found");
            return Err(AutoTranslateError::TranslatorUnavailable(
                "DeepL API key is empty or not found".to_string(),
            ));
        };

        let translator = DeepLTranslator::new(api_key, config)?;
        info!("Translator successfully initialized ({})", translator.endpoint());
        Ok(translator)
    }
}

/// Check that an API key is present and DeepL accepts it
pub async fn check_deepl_availability(
    config: &TranslatorConfig,
    key_source: &dyn ApiKeySource,
) -> Result<deepl::DeepLUsage> {
    TranslatorFactory::create_deepl(config, key_source)?
        .check_availability()
        .await
}
