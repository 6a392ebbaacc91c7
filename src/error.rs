use thiserror::Error;

#[derive(Error, Debug)]
pub enum AutoTranslateError {
    /// Missing source locale, empty locale list or malformed settings
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// No API key, or the provider cannot be reached at all
    #[error("Translator unavailable: {0}")]
    TranslatorUnavailable(String),

    /// A single translation call failed
    #[error("Translation error: {0}")]
    Translation(String),

    /// The record store could not load or save a record
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// The background translation worker no longer accepts jobs
    #[error("Translation queue is closed")]
    QueueClosed,
}

impl AutoTranslateError {
    /// Errors that abort a translation run without being a real failure of the save flow
    pub fn is_soft_skip(&self) -> bool {
        matches!(self, Self::TranslatorUnavailable(_))
    }
}

pub type Result<T> = std::result::Result<T, AutoTranslateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_soft_skip_classification() {
        assert!(AutoTranslateError::TranslatorUnavailable("no key".into()).is_soft_skip());
        assert!(!AutoTranslateError::Configuration("no source".into()).is_soft_skip());
        assert!(!AutoTranslateError::Persistence("disk full".into()).is_soft_skip());
        assert!(!AutoTranslateError::QueueClosed.is_soft_skip());
    }

    #[test]
    fn test_display_messages() {
        let err = AutoTranslateError::Translation("quota exceeded".to_string());
        assert_eq!(err.to_string(), "Translation error: quota exceeded");
    }
}
