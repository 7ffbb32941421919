use crate::config::Config;
use crate::error::{ApiError, Result};
use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

const MAX_TEXT_PREVIEW_LENGTH: usize = 100;

/// Black-box text-to-vector capability.
///
/// The production implementation calls a remote model; tests substitute a
/// deterministic stub.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// Sentence embedder backed by the HuggingFace Inference API.
///
/// One request per call: failures are surfaced to the caller immediately, so
/// the serving path stays synchronous and retry-free.
#[derive(Clone)]
pub struct HuggingFaceEmbedder {
    client: Client,
    api_key: String,
    model_url: String,
    model_name: String,
}

impl HuggingFaceEmbedder {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .build()
            .map_err(|e| ApiError::InternalError(format!("Failed to create HTTP client: {}", e)))?;

        let model_url = format!(
            "{}/models/{}",
            config.huggingface_base_url.trim_end_matches('/'),
            config.huggingface_model
        );
        info!("Using embedding model {} at {}", config.huggingface_model, model_url);

        Ok(Self {
            client,
            api_key: config.huggingface_api_key.clone(),
            model_url,
            model_name: config.huggingface_model.clone(),
        })
    }

    async fn request_embedding(&self, text: &str) -> Result<Vec<f32>> {
        #[derive(Serialize)]
        struct Request<'a> {
            inputs: &'a str,
            options: Options,
        }

        #[derive(Serialize)]
        struct Options {
            wait_for_model: bool,
            use_cache: bool,
        }

        let request = Request {
            inputs: text,
            options: Options {
                wait_for_model: true,
                use_cache: true,
            },
        };

        let response = self
            .client
            .post(&self.model_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| ApiError::IndexUnavailable(format!("embedding request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let detail = match status.as_u16() {
                401 | 403 => "authentication with the embedding service failed".to_string(),
                404 => format!("embedding model {} not found", self.model_name),
                _ => format!("embedding service returned {}: {}", status, body),
            };
            return Err(ApiError::IndexUnavailable(detail));
        }

        let value: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ApiError::IndexUnavailable(format!("unreadable embedding response: {}", e)))?;

        parse_embedding(&value)
            .ok_or_else(|| ApiError::IndexUnavailable("no embedding in response".to_string()))
    }
}

#[async_trait]
impl Embedder for HuggingFaceEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let preview: String = text.chars().take(MAX_TEXT_PREVIEW_LENGTH).collect();
        debug!("Encoding text (length {}): {}", text.len(), preview);
        self.request_embedding(text).await
    }
}

/// The feature-extraction pipeline answers either `[f32...]` or `[[f32...]]`.
fn parse_embedding(value: &serde_json::Value) -> Option<Vec<f32>> {
    let array = value.as_array()?;
    let numbers = match array.first()? {
        serde_json::Value::Array(inner) => inner,
        _ => array,
    };

    let embedding: Vec<f32> = numbers
        .iter()
        .filter_map(|v| v.as_f64().map(|f| f as f32))
        .collect();

    if embedding.len() == numbers.len() && !embedding.is_empty() {
        Some(embedding)
    } else {
        None
    }
}
