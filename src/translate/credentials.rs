use tracing::debug;

use crate::config::TranslatorConfig;

/// Where the translation API key comes from
#[cfg_attr(test, mockall::automock)]
pub trait ApiKeySource: Send + Sync {
    /// The key, or `None` when absent or blank
    fn get_api_key(&self) -> Option<String>;
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// A key fixed at construction, typically read from the config file
#[derive(Debug, Clone, Default)]
pub struct StaticApiKey(pub Option<String>);

impl ApiKeySource for StaticApiKey {
    fn get_api_key(&self) -> Option<String> {
        non_blank(self.0.clone())
    }
}

/// A key read from an environment variable on every lookup
#[derive(Debug, Clone)]
pub struct EnvApiKey {
    pub var: String,
}

impl ApiKeySource for EnvApiKey {
    fn get_api_key(&self) -> Option<String> {
        let key = non_blank(std::env::var(&self.var).ok());
        if key.is_none() {
            debug!("Environment variable {} is not set", self.var);
        }
        key
    }
}

/// First source that yields a key wins
pub struct ChainedApiKey {
    sources: Vec<Box<dyn ApiKeySource>>,
}

impl ChainedApiKey {
    pub fn new(sources: Vec<Box<dyn ApiKeySource>>) -> Self {
        Self { sources }
    }

    /// Config value first, then the configured environment variable
    pub fn from_config(config: &TranslatorConfig) -> Self {
        Self::new(vec![
            Box::new(StaticApiKey(config.api_key.clone())),
            Box::new(EnvApiKey { var: config.api_key_env.clone() }),
        ])
    }
}

impl ApiKeySource for ChainedApiKey {
    fn get_api_key(&self) -> Option<String> {
        self.sources.iter().find_map(|source| source.get_api_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_key_blank_is_absent() {
        assert_eq!(StaticApiKey(Some("  ".to_string())).get_api_key(), None);
        assert_eq!(StaticApiKey(None).get_api_key(), None);
        assert_eq!(StaticApiKey(Some(" k:fx ".to_string())).get_api_key().as_deref(), Some("k:fx"));
    }

    #[test]
    fn test_env_key() {
        let var = "AUTO_TRANSLATE_TEST_KEY_ENV_LOOKUP";
        // SAFETY: the variable name is unique to this test
        unsafe { std::env::set_var(var, "from-env") };
        let source = EnvApiKey { var: var.to_string() };
        assert_eq!(source.get_api_key().as_deref(), Some("from-env"));
        unsafe { std::env::remove_var(var) };
        assert_eq!(source.get_api_key(), None);
    }

    #[test]
    fn test_chain_falls_through_to_next_source() {
        let mut empty = MockApiKeySource::new();
        empty.expect_get_api_key().times(1).return_const(None::<String>);
        let mut present = MockApiKeySource::new();
        present.expect_get_api_key().times(1).return_const(Some("second".to_string()));

        let chain = ChainedApiKey::new(vec![Box::new(empty), Box::new(present)]);
        assert_eq!(chain.get_api_key().as_deref(), Some("second"));
    }

    #[test]
    fn test_chain_prefers_config_value() {
        let mut config = crate::config::Config::default().translator;
        config.api_key = Some("from-config".to_string());
        config.api_key_env = "AUTO_TRANSLATE_TEST_KEY_UNSET".to_string();

        let chain = ChainedApiKey::from_config(&config);
        assert_eq!(chain.get_api_key().as_deref(), Some("from-config"));
    }
}
