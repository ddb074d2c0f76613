// lingua-relay-providers/src/openai.rs
// ============================================================================
// Module: OpenAI-Compatible Translator
// Description: Chat-completions client implementing the Translator interface.
// Purpose: Produce translations from any OpenAI-compatible completion endpoint.
// Dependencies: lingua-relay-core, reqwest, serde, serde_json
// ============================================================================

//! ## Overview
//! [`OpenAiTranslator`] POSTs a chat-completions request per translation:
//! a fixed professional-translator system prompt, a user prompt carrying the
//! source and target languages plus a context hint, low temperature for
//! stable output, and a token bound. The first choice is returned trimmed;
//! an empty choice list maps to [`TranslateError::Empty`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use lingua_relay_core::TranslateError;
use lingua_relay_core::TranslateQuery;
use lingua_relay_core::Translator;
use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// System prompt pinning the model to translation-only output.
const SYSTEM_PROMPT: &str = "You are a professional translator. Translate the given text \
     accurately while preserving the meaning and context. Return only the translated text \
     without any additional explanations, formatting, or quotes.";

/// Configuration for the OpenAI-compatible translator.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OpenAiTranslatorConfig {
    /// Chat-completions endpoint URL.
    pub api_url: String,
    /// Bearer token for the endpoint.
    pub api_key: String,
    /// Model identifier.
    pub model: String,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Maximum completion tokens per translation.
    pub max_tokens: u32,
}

impl Default for OpenAiTranslatorConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.openai.com/v1/chat/completions".to_string(),
            api_key: String::new(),
            model: "gpt-4".to_string(),
            timeout_ms: 30_000,
            max_tokens: 1_000,
        }
    }
}

// ============================================================================
// SECTION: Wire Types
// ============================================================================

/// One chat message in the completion request.
#[derive(Debug, Serialize)]
struct ChatMessage {
    /// Message role (`system` or `user`).
    role: &'static str,
    /// Message content.
    content: String,
}

/// Chat-completions request body.
#[derive(Debug, Serialize)]
struct CompletionRequest {
    /// Model identifier.
    model: String,
    /// Conversation messages.
    messages: Vec<ChatMessage>,
    /// Sampling temperature; low for consistent translations.
    temperature: f64,
    /// Completion token bound.
    max_tokens: u32,
}

/// Chat-completions response body, reduced to what the translator reads.
#[derive(Debug, Deserialize)]
struct CompletionResponse {
    /// Returned choices, first one wins.
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

/// One returned completion choice.
#[derive(Debug, Deserialize)]
struct CompletionChoice {
    /// Message holding the completion text.
    message: CompletionMessage,
}

/// Completion message content.
#[derive(Debug, Deserialize)]
struct CompletionMessage {
    /// Completion text.
    content: String,
}

// ============================================================================
// SECTION: Translator Implementation
// ============================================================================

/// Translator backed by an OpenAI-compatible chat-completions endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiTranslator {
    /// Translator configuration.
    config: OpenAiTranslatorConfig,
    /// HTTP client used for outbound requests.
    client: Client,
}

impl OpenAiTranslator {
    /// Creates a translator with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TranslateError::Http`] when the HTTP client cannot be built.
    pub fn new(config: OpenAiTranslatorConfig) -> Result<Self, TranslateError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|err| TranslateError::Http(format!("client build failed: {err}")))?;
        Ok(Self {
            config,
            client,
        })
    }
}

#[async_trait]
impl Translator for OpenAiTranslator {
    async fn translate(&self, query: &TranslateQuery) -> Result<String, TranslateError> {
        let body = CompletionRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: build_prompt(query),
                },
            ],
            temperature: 0.3,
            max_tokens: self.config.max_tokens,
        };

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| TranslateError::Http(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(TranslateError::Api(format!("{status}: {detail}")));
        }

        let completion: CompletionResponse =
            response.json().await.map_err(|err| TranslateError::Api(err.to_string()))?;
        extract_translation(completion)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds the user prompt for one translation query.
fn build_prompt(query: &TranslateQuery) -> String {
    let mut prompt = format!(
        "Translate the following text from {} to {}:\n\n",
        query.source, query.target
    );
    if !query.context_hint.is_empty() {
        prompt.push_str(&format!("Context: {}\n\n", query.context_hint));
    }
    prompt.push_str(&format!("Text to translate: \"{}\"\n\n", query.text));
    prompt.push_str(
        "Provide only the translated text without any additional formatting, quotes, or explanations.",
    );
    prompt
}

/// Pulls the first choice out of a completion response.
fn extract_translation(completion: CompletionResponse) -> Result<String, TranslateError> {
    let choice = completion.choices.into_iter().next().ok_or(TranslateError::Empty)?;
    let text = choice.message.content.trim().to_string();
    if text.is_empty() {
        return Err(TranslateError::Empty);
    }
    Ok(text)
}

// ============================================================================
// SECTION: Tests
// ============================================================================
