//! Blocking HTTP client for an Anthropic-style messages API.

use std::time::Duration;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ModelError;
use crate::{DocumentPayload, ExtractionRequest, ModelClient, Result};

/// Connection settings for the model service.
///
/// The API key is resolved from the environment at startup (see
/// [`api_key_from_env`]) and never read from configuration files.
#[derive(Debug, Clone)]
pub struct ModelSettings {
    /// API key sent in the `x-api-key` header.
    pub api_key: String,
    /// Model identifier.
    pub model: String,
    /// Messages endpoint URL.
    pub endpoint: String,
    /// Maximum tokens in the response.
    pub max_tokens: u32,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "claude-haiku-4-5".to_string(),
            endpoint: "https://api.anthropic.com/v1/messages".to_string(),
            max_tokens: 1024,
            timeout_secs: 60,
        }
    }
}

/// Resolve the API key from the environment, honoring a `.env` file.
pub fn api_key_from_env() -> Result<String> {
    let _ = dotenvy::dotenv();
    std::env::var("LOGIPARSE_API_KEY")
        .or_else(|_| std::env::var("ANTHROPIC_API_KEY"))
        .map_err(|_| ModelError::MissingApiKey)
}

#[derive(Debug, Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: Vec<ContentBlock>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text { text: String },
    Image { source: MediaSource },
    Document { source: MediaSource },
}

#[derive(Debug, Serialize)]
struct MediaSource {
    #[serde(rename = "type")]
    kind: &'static str,
    media_type: String,
    data: String,
}

impl MediaSource {
    fn base64(mime: &str, data: &[u8]) -> Self {
        Self {
            kind: "base64",
            media_type: mime.to_string(),
            data: BASE64.encode(data),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    content: Vec<ResponseBlock>,
}

#[derive(Debug, Deserialize)]
struct ResponseBlock {
    #[serde(default)]
    text: String,
}

/// Client for the Anthropic messages API.
pub struct AnthropicClient {
    settings: ModelSettings,
    client: reqwest::blocking::Client,
}

impl AnthropicClient {
    /// Create a client with the given settings.
    pub fn new(settings: ModelSettings) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self { settings, client })
    }

    fn content_blocks(request: &ExtractionRequest) -> Vec<ContentBlock> {
        match &request.payload {
            DocumentPayload::Text(text) => vec![ContentBlock::Text {
                text: format!("{}\n\n{}", request.instruction, text),
            }],
            DocumentPayload::Binary { data, mime } => {
                let source = MediaSource::base64(mime, data);
                let media = if mime == "application/pdf" {
                    ContentBlock::Document { source }
                } else {
                    ContentBlock::Image { source }
                };
                vec![
                    media,
                    ContentBlock::Text {
                        text: request.instruction.clone(),
                    },
                ]
            }
        }
    }
}

impl ModelClient for AnthropicClient {
    fn complete(&self, request: &ExtractionRequest) -> Result<String> {
        let body = ApiRequest {
            model: &self.settings.model,
            max_tokens: self.settings.max_tokens,
            messages: vec![Message {
                role: "user",
                content: Self::content_blocks(request),
            }],
        };

        let response = self
            .client
            .post(&self.settings.endpoint)
            .header("x-api-key", &self.settings.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&body)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ModelError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let api_response: ApiResponse = response.json()?;
        debug!(blocks = api_response.content.len(), "model response received");

        api_response
            .content
            .into_iter()
            .map(|block| block.text)
            .find(|text| !text.is_empty())
            .ok_or(ModelError::EmptyResponse)
    }
}
