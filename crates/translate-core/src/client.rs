//! Translation backends

use crate::error::TranslateError;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";

/// Translates one chunk of text at a time
#[async_trait]
pub trait Translator: Send + Sync {
    /// `source` may be `auto`
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String, TranslateError>;
}

/// Client for the public Google Translate web endpoint
pub struct GoogleTranslator {
    client: Client,
    endpoint: String,
}

impl GoogleTranslator {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, TranslateError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(timeout)
            .build()
            .map_err(|e| TranslateError::Upstream(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

impl fmt::Debug for GoogleTranslator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleTranslator")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String, TranslateError> {
        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("client", "gtx"), ("sl", source), ("tl", target), ("dt", "t")])
            .form(&[("q", text)])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TranslateError::Upstream(format!("Translation request timeout: {}", e))
                } else if e.is_connect() {
                    TranslateError::Upstream(format!("Failed to connect to translation service: {}", e))
                } else {
                    TranslateError::Upstream(format!("Translation request failed: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranslateError::Upstream(format!(
                "Translation service returned {}: {}",
                status, body
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| TranslateError::Upstream(format!("Failed to parse response: {}", e)))?;
        parse_response(&body)
    }
}

/// The endpoint answers `[[["translated", "original", ...], ...], ...]`
pub(crate) fn parse_response(body: &Value) -> Result<String, TranslateError> {
    let segments = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| TranslateError::Upstream("Unexpected response shape".into()))?;

    Ok(segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_joins_segments() {
        let body = json!([[["Hello ", "Halo ", null], ["world", "dunia", null]], null, "id"]);
        assert_eq!(parse_response(&body).unwrap(), "Hello world");
    }

    #[test]
    fn test_parse_rejects_unexpected_shape() {
        assert!(matches!(
            parse_response(&json!({"error": "nope"})),
            Err(TranslateError::Upstream(_))
        ));
    }
}
