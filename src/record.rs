use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `field -> locale -> text`
pub type TranslationMap = BTreeMap<String, BTreeMap<String, String>>;

/// Capability a record must provide to be translated automatically
pub trait Translatable {
    fn id(&self) -> &str;

    /// Attributes eligible for automatic translation
    fn translatable_fields(&self) -> &[String];

    /// Locale the record was authored in
    fn source_locale(&self) -> &str;

    fn translations(&self) -> &TranslationMap;

    fn set_translation(&mut self, field: &str, locale: &str, text: String);

    fn should_auto_translate(&self) -> bool {
        true
    }

    /// One-shot opt-out for a single save
    fn skip_translation(&self) -> bool {
        false
    }

    fn translation(&self, field: &str, locale: &str) -> Option<&str> {
        self.translations()
            .get(field)
            .and_then(|locales| locales.get(locale))
            .map(String::as_str)
    }
}

fn default_auto_translate() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslatableRecord {
    pub id: String,
    #[serde(default)]
    pub source_locale: String,
    pub fields: Vec<String>,
    #[serde(default)]
    pub translations: TranslationMap,
    #[serde(default = "default_auto_translate")]
    pub auto_translate: bool,
    #[serde(skip)]
    pub skip_translation: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl TranslatableRecord {
    pub fn new<S: Into<String>>(id: impl Into<String>, source_locale: impl Into<String>, fields: impl IntoIterator<Item = S>) -> Self {
        Self {
            id: id.into(),
            source_locale: source_locale.into(),
            fields: fields.into_iter().map(Into::into).collect(),
            translations: TranslationMap::new(),
            auto_translate: true,
            skip_translation: false,
            updated_at: None,
        }
    }

    pub fn with_translation(mut self, field: &str, locale: &str, text: &str) -> Self {
        self.set_translation(field, locale, text.to_string());
        self
    }

    /// Fill in `default` when the record declares no source locale; returns whether it did
    pub fn ensure_source_locale(&mut self, default: &str) -> bool {
        if !self.source_locale.trim().is_empty() || default.trim().is_empty() {
            return false;
        }
        self.source_locale = default.trim().to_string();
        true
    }
}

impl Translatable for TranslatableRecord {
    fn id(&self) -> &str {
        &self.id
    }

    fn translatable_fields(&self) -> &[String] {
        &self.fields
    }

    fn source_locale(&self) -> &str {
        &self.source_locale
    }

    fn translations(&self) -> &TranslationMap {
        &self.translations
    }

    fn set_translation(&mut self, field: &str, locale: &str, text: String) {
        self.translations
            .entry(field.to_string())
            .or_default()
            .insert(locale.to_string(), text);
    }

    fn should_auto_translate(&self) -> bool {
        self.auto_translate
    }

    fn skip_translation(&self) -> bool {
        self.skip_translation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translation_lookup() {
        let record = TranslatableRecord::new("post-1", "en", ["title", "slug"])
            .with_translation("title", "en", "Hello World");

        assert_eq!(record.translation("title", "en"), Some("Hello World"));
        assert_eq!(record.translation("title", "fr"), None);
        assert_eq!(record.translation("slug", "en"), None);
    }

    #[test]
    fn test_deserialize_applies_defaults() {
        let record: TranslatableRecord = serde_json::from_str(
            r#"{"id": "7", "fields": ["title"], "skip_translation": true}"#,
        )
        .unwrap();

        assert!(record.should_auto_translate());
        assert!(!record.skip_translation());
        assert!(record.source_locale.is_empty());
        assert!(record.translations.is_empty());
    }

    #[test]
    fn test_ensure_source_locale() {
        let mut record = TranslatableRecord::new("7", "", ["title"]);
        assert!(record.ensure_source_locale("en"));
        assert_eq!(record.source_locale(), "en");
        assert!(!record.ensure_source_locale("fr"));
        assert_eq!(record.source_locale(), "en");
    }

    #[test]
    fn test_serialized_shape() {
        let record = TranslatableRecord::new("7", "en", ["title"])
            .with_translation("title", "en", "Hi");
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["translations"]["title"]["en"], "Hi");
        assert!(value.get("skip_translation").is_none());
        assert!(value.get("updated_at").is_none());
    }
}
