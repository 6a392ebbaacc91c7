use serde::{Deserialize, Serialize};

use crate::config::LocaleConfig;

/// Ordered, de-duplicated list of supported locale codes
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct LocaleSet {
    locales: Vec<String>,
}

impl LocaleSet {
    pub fn new<I, S>(locales: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::default();
        for locale in locales {
            let locale = locale.into().trim().to_string();
            if !locale.is_empty() && !set.locales.contains(&locale) {
                set.locales.push(locale);
            }
        }
        set
    }

    pub fn from_config(config: &LocaleConfig) -> Self {
        Self::new(config.supported.iter().cloned())
    }

    pub fn contains(&self, locale: &str) -> bool {
        self.locales.iter().any(|l| l == locale)
    }

    pub fn len(&self) -> usize {
        self.locales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locales.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.locales.iter().map(String::as_str)
    }

    /// Every supported locale except the source, in declaration order
    pub fn targets_for<'a>(&'a self, source_locale: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.iter().filter(move |l| *l != source_locale)
    }
}

impl From<Vec<String>> for LocaleSet {
    fn from(locales: Vec<String>) -> Self {
        Self::new(locales)
    }
}

impl From<LocaleSet> for Vec<String> {
    fn from(set: LocaleSet) -> Self {
        set.locales
    }
}
