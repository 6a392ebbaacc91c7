use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, error, info, warn};

use crate::error::{AutoTranslateError, Result};
use crate::locale::LocaleSet;
use crate::record::{Translatable, TranslationMap};
use crate::slug::{slugify, SLUG_FIELD};
use crate::translate::Translator;

/// Outcome of one gap-filling pass over a record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranslationResult {
    /// Existing entries plus every newly filled one
    pub translations: TranslationMap,
    /// Whether at least one entry was added
    pub changed: bool,
    /// Newly filled `(field, locale)` pairs, in the order they were filled
    pub filled: Vec<(String, String)>,
    /// Pairs whose translator call failed
    pub failed: Vec<(String, String)>,
    /// Fields skipped because their source text is empty
    pub skipped_fields: Vec<String>,
}

impl TranslationResult {
    fn unchanged(translations: TranslationMap) -> Self {
        Self {
            translations,
            ..Self::default()
        }
    }
}

/// Fills translation gaps of a record without ever overwriting an existing entry
pub struct TranslationFiller;

impl TranslationFiller {
    pub async fn fill<R>(record: &R, locales: &LocaleSet, translator: &dyn Translator) -> Result<TranslationResult>
    where
        R: Translatable + ?Sized,
    {
        let source_locale = record.source_locale().trim();
        if source_locale.is_empty() {
            error!("Source language is empty for record {}", record.id());
            return Err(AutoTranslateError::Configuration(format!(
                "Source locale not set on record {}", record.id()
            )));
        }

        let mut result = TranslationResult::unchanged(record.translations().clone());

        let fields = record.translatable_fields();
        if fields.is_empty() {
            debug!("Record {} declares no translatable fields", record.id());
            return Ok(result);
        }

        info!(
            "Starting attributes translation for record {} (source {}, fields {:?})",
            record.id(), source_locale, fields
        );

        let mut attempted: HashSet<(&str, &str)> = HashSet::new();

        for field in fields {
            let source_text = match record.translation(field, source_locale) {
                Some(text) if !text.trim().is_empty() => text,
                _ => {
                    warn!("Empty source text for attribute '{}' on record {}", field, record.id());
                    if !result.skipped_fields.contains(field) {
                        result.skipped_fields.push(field.clone());
                    }
                    continue;
                }
            };

            for target_locale in locales.targets_for(source_locale) {
                if !attempted.insert((field.as_str(), target_locale)) {
                    continue;
                }
                if has_entry(&result.translations, field, target_locale) {
                    continue;
                }

                match translator.translate(source_text, target_locale).await {
                    Ok(translated) => {
                        let text = if field == SLUG_FIELD { slugify(&translated) } else { translated };
                        result.translations
                            .entry(field.clone())
                            .or_default()
                            .insert(target_locale.to_string(), text);
                        result.filled.push((field.clone(), target_locale.to_string()));
                        result.changed = true;
                        info!("Translation set for attribute '{}' ({})", field, target_locale);
                    }
                    Err(e) => {
                        error!("Translation failed for attribute '{}' ({}): {}", field, target_locale, e);
                        result.failed.push((field.clone(), target_locale.to_string()));
                    }
                }
            }
        }

        if result.changed {
            info!("Filled {} translation(s) for record {}", result.filled.len(), record.id());
        } else {
            info!("No new translations were added for record {}", record.id());
        }

        Ok(result)
    }
}

/// An entry counts as present unless its text is the empty string
fn has_entry(translations: &TranslationMap, field: &str, locale: &str) -> bool {
    translations
        .get(field)
        .and_then(|locales| locales.get(locale))
        .is_some_and(|text| !text.is_empty())
}
