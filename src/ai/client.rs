//! Inference endpoint client.
//!
//! A single "prompt in, text out" operation against an OpenAI-compatible
//! chat/completions endpoint. Every call carries its own deadline: the
//! request future is raced against a timer, and dropping it on timeout
//! aborts the in-flight request and releases the connection.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

const SYSTEM_PROMPT: &str = "You are a precise assistant. Follow instructions exactly. \
                             Return only the requested format, nothing else.";

#[derive(Debug)]
pub enum InferenceError {
    Timeout(Duration),
    Request(String),
    Status(u16, String),
    InvalidResponse(String),
}

impl std::fmt::Display for InferenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Timeout(after) => write!(f, "inference call timed out after {:?}", after),
            Self::Request(msg) => write!(f, "inference request failed: {}", msg),
            Self::Status(code, msg) => write!(f, "inference endpoint returned {}: {}", code, msg),
            Self::InvalidResponse(msg) => write!(f, "invalid inference response: {}", msg),
        }
    }
}

impl std::error::Error for InferenceError {}

/// Text-generation endpoint, treated as opaque.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    /// Run one completion under the given deadline, returning the trimmed
    /// generated text.
    async fn complete(
        &self,
        prompt: &str,
        max_tokens: u32,
        timeout: Duration,
    ) -> Result<String, InferenceError>;
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
    stream: bool,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

/// HTTP client for any OpenAI-compatible endpoint (local inference server
/// or hosted API; the credential is optional for the former).
pub struct HttpInferenceClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl HttpInferenceClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            api_key,
            model: model.into(),
        }
    }

    async fn send(&self, prompt: &str, max_tokens: u32) -> Result<String, InferenceError> {
        let body = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: prompt.to_string(),
                },
            ],
            max_tokens,
            temperature: 0.65,
            stream: false,
        };

        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let mut request = self.client.post(&url).json(&body);
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| InferenceError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(InferenceError::Status(status.as_u16(), text));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| InferenceError::InvalidResponse(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.trim().to_string())
            .ok_or_else(|| InferenceError::InvalidResponse("no completion in response".into()))
    }
}

#[async_trait]
impl InferenceClient for HttpInferenceClient {
    async fn complete(
        &self,
        prompt: &str,
        max_tokens: u32,
        timeout: Duration,
    ) -> Result<String, InferenceError> {
        match tokio::time::timeout(timeout, self.send(prompt, max_tokens)).await {
            Ok(result) => result,
            // Dropping the send future cancels the underlying request
            Err(_) => Err(InferenceError::Timeout(timeout)),
        }
    }
}

impl std::fmt::Debug for HttpInferenceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpInferenceClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}
