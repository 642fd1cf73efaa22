//! Text translation to the configured target language.
//!
//! The [`Translator`] trait is the seam the detail resolver depends on; the
//! shipped implementation calls the public Google translate web endpoint
//! (`translate_a/single` with `client=gtx`), which needs no credentials.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::config::TranslatorConfig;
use crate::error::{Error, Result};

const CONNECTION_TIMEOUT: Duration = Duration::from_secs(10);

/// Synchronous text-to-text translation, no batching.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` into the `target` language.
    async fn translate(&self, text: &str, target: &str) -> Result<String>;
}

/// Translator backed by the Google translate web endpoint.
pub struct GoogleTranslator {
    client: reqwest::Client,
    base_url: String,
}

impl GoogleTranslator {
    /// Create a new translator from config.
    pub fn new(config: &TranslatorConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(CONNECTION_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build HTTP client: {}", e);
                reqwest::Client::new()
            });

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(&self, text: &str, target: &str) -> Result<String> {
        if text.is_empty() {
            return Ok(String::new());
        }

        let url = format!(
            "{}/translate_a/single?client=gtx&sl=auto&tl={}&dt=t&q={}",
            self.base_url,
            target,
            urlencoded(text)
        );
        debug!(target = target, chars = text.len(), "translate");

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::transport(format!("translation request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(Error::transport(format!(
                "translation returned {}",
                resp.status()
            )));
        }

        let body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| Error::data_shape(format!("failed to parse translation: {e}")))?;

        parse_translation(&body)
    }
}

/// Extract the translated text from the endpoint's nested-array body.
///
/// The body is `[[["<translated>", "<source>", ...], ...], ...]`; the first
/// element of each inner segment is one translated chunk.
fn parse_translation(body: &serde_json::Value) -> Result<String> {
    let segments = body
        .get(0)
        .and_then(|v| v.as_array())
        .ok_or_else(|| Error::data_shape("translation body missing segment array"))?;

    let mut out = String::new();
    for segment in segments {
        if let Some(chunk) = segment.get(0).and_then(|v| v.as_str()) {
            out.push_str(chunk);
        }
    }
    Ok(out)
}

/// Minimal percent-encoding for query parameter values.
fn urlencoded(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char);
            }
            b' ' => out.push('+'),
            _ => {
                out.push('%');
                out.push(char::from(HEX[(b >> 4) as usize]));
                out.push(char::from(HEX[(b & 0x0f) as usize]));
            }
        }
    }
    out
}

const HEX: [u8; 16] = *b"0123456789ABCDEF";
