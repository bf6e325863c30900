use async_trait::async_trait;
use log::debug;
use reqwest::{ Client as HttpClient, header::{ HeaderMap, HeaderValue, CONTENT_TYPE, AUTHORIZATION } };
use serde::Serialize;

use super::{ build_http, post_completion, ChatClient };
use crate::llm::{ CompletionConfig, CompletionError, Transport, DEFAULT_BASE_URL };
use crate::models::chat::Message;

/// Talks to the provider's chat completions endpoint directly, with the
/// bearer key attached to every request.
pub struct OpenAIChatClient {
    http: HttpClient,
    url: String,
    model: String,
    max_completion_tokens: u32,
}

#[derive(Serialize)]
struct OpenAIChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    max_completion_tokens: u32,
}

impl OpenAIChatClient {
    pub fn new(
        api_key: &str,
        base_url: Option<&str>,
        config: &CompletionConfig
    ) -> Result<Self, CompletionError> {
        let base = base_url.unwrap_or(DEFAULT_BASE_URL);
        let url = if base.ends_with("/v1/chat/completions") {
            base.to_string()
        } else {
            format!("{}/v1/chat/completions", base.trim_end_matches('/'))
        };

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|e| CompletionError::Request(format!("Invalid API key format: {}", e)))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        Ok(Self {
            http: build_http(headers, config)?,
            url,
            model: config.model.clone(),
            max_completion_tokens: config.max_tokens,
        })
    }

    pub fn from_config(config: &CompletionConfig) -> Result<Self, CompletionError> {
        match &config.transport {
            Transport::Direct { base_url, api_key } => Self::new(api_key, Some(base_url.as_str()), config),
            Transport::Proxy { .. } =>
                Err(CompletionError::Request("direct client built from a proxy config".to_string())),
        }
    }
}

#[async_trait]
impl ChatClient for OpenAIChatClient {
    async fn complete(&self, messages: &[Message]) -> Result<String, CompletionError> {
        let req = OpenAIChatRequest {
            model: &self.model,
            messages,
            max_completion_tokens: self.max_completion_tokens,
        };
        debug!("Sending {} messages to {} (model {})", messages.len(), self.url, self.model);
        post_completion(&self.http, &self.url, &req).await
    }

    fn endpoint(&self) -> &str {
        &self.url
    }
}
