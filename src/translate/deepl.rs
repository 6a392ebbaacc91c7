use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use crate::config::TranslatorConfig;
use crate::error::{AutoTranslateError, Result};
use super::Translator;

const FREE_ENDPOINT: &str = "https://api-free.deepl.com";
const PRO_ENDPOINT: &str = "https://api.deepl.com";

/// DeepL answers 456 when the character quota is used up
const QUOTA_EXCEEDED: u16 = 456;

#[derive(Debug, Clone, Serialize)]
pub struct DeepLRequest<'a> {
    pub text: Vec<&'a str>,
    pub target_lang: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeepLResponse {
    pub translations: Vec<DeepLTranslation>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeepLTranslation {
    #[serde(default)]
    pub detected_source_language: Option<String>,
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeepLUsage {
    pub character_count: u64,
    pub character_limit: u64,
}

/// Translator backed by the DeepL REST API
pub struct DeepLTranslator {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl DeepLTranslator {
    pub fn new(api_key: String, config: &TranslatorConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AutoTranslateError::TranslatorUnavailable(format!("Failed to build HTTP client: {}", e)))?;

        let endpoint = config
            .endpoint
            .clone()
            .unwrap_or_else(|| default_endpoint(&api_key).to_string());

        Ok(Self {
            client,
            api_key,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn auth_header(&self) -> String {
        format!("DeepL-Auth-Key {}", self.api_key)
    }

    /// Query the account usage; doubles as a credential and connectivity check
    pub async fn check_availability(&self) -> Result<DeepLUsage> {
        let url = format!("{}/v2/usage", self.endpoint);
        debug!("Checking DeepL availability at: {}", url);

        let response = self.client
            .get(&url)
            .header("Authorization", self.auth_header())
            .send()
            .await
            .map_err(|e| AutoTranslateError::TranslatorUnavailable(format!("Failed to connect to DeepL: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = error_body(response).await;
            return Err(AutoTranslateError::TranslatorUnavailable(format!(
                "DeepL rejected the credentials ({}): {}", status, error_text
            )));
        }

        let usage: DeepLUsage = response.json().await
            .map_err(|e| AutoTranslateError::TranslatorUnavailable(format!("Failed to parse usage response: {}", e)))?;

        info!("DeepL is available ({} of {} characters used)", usage.character_count, usage.character_limit);
        Ok(usage)
    }
}

#[async_trait]
impl Translator for DeepLTranslator {
    async fn translate(&self, text: &str, target_locale: &str) -> Result<String> {
        let request = DeepLRequest {
            text: vec![text],
            target_lang: target_lang_code(target_locale),
        };

        let url = format!("{}/v2/translate", self.endpoint);
        debug!("Sending translation request to: {} (target {})", url, request.target_lang);

        let response = self.client
            .post(&url)
            .header("Authorization", self.auth_header())
            .json(&request)
            .send()
            .await
            .map_err(|e| AutoTranslateError::Translation(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = error_body(response).await;
            return Err(status_error(status, &error_text));
        }

        let body: DeepLResponse = response.json().await
            .map_err(|e| AutoTranslateError::Translation(format!("Failed to parse response: {}", e)))?;

        first_translation(body)
    }
}

async fn error_body(response: reqwest::Response) -> String {
    match response.text().await {
        Ok(body) => body,
        Err(e) => {
            debug!("Failed to read DeepL error body: {}", e);
            String::new()
        }
    }
}

/// Free-tier keys carry a `:fx` suffix and live on a separate host
pub fn default_endpoint(api_key: &str) -> &'static str {
    if api_key.trim().ends_with(":fx") {
        FREE_ENDPOINT
    } else {
        PRO_ENDPOINT
    }
}

/// Map an application locale to a DeepL target language code.
///
/// DeepL no longer accepts bare `EN` or `PT` as targets.
pub fn target_lang_code(locale: &str) -> String {
    let code = locale.trim().replace('_', "-").to_uppercase();
    match code.as_str() {
        "EN" => "EN-US".to_string(),
        "PT" => "PT-PT".to_string(),
        _ => code,
    }
}

fn status_error(status: StatusCode, body: &str) -> AutoTranslateError {
    match status.as_u16() {
        403 => AutoTranslateError::Translation(format!("DeepL authorization failed: {}", body)),
        429 => AutoTranslateError::Translation("DeepL rate limit exceeded".to_string()),
        QUOTA_EXCEEDED => AutoTranslateError::Translation("DeepL character quota exceeded".to_string()),
        _ => AutoTranslateError::Translation(format!("DeepL API error {}: {}", status, body)),
    }
}

fn first_translation(body: DeepLResponse) -> Result<String> {
    body.translations
        .into_iter()
        .next()
        .map(|t| t.text)
        .ok_or_else(|| AutoTranslateError::Translation("Empty translation received".to_string()))
}
