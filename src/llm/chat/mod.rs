pub mod openai;
pub mod proxy;

use async_trait::async_trait;
use log::debug;
use reqwest::header::HeaderMap;
use reqwest::Client as HttpClient;
use serde::{ Deserialize, Serialize };
use std::sync::Arc;

use self::openai::OpenAIChatClient;
use self::proxy::ProxyChatClient;
use super::{ CompletionConfig, CompletionError, Transport };
use crate::models::chat::Message;

#[derive(Deserialize, Debug)]
pub struct ChatCompletionResponse {
    pub choices: Vec<ChatChoice>,
}

#[derive(Deserialize, Debug)]
pub struct ChatChoice {
    pub message: ChoiceMessage,
}

#[derive(Deserialize, Debug)]
pub struct ChoiceMessage {
    pub content: String,
}

impl ChatCompletionResponse {
    pub fn into_first_content(self) -> Result<String, CompletionError> {
        self.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(CompletionError::MissingContent)
    }
}

/// A backend that turns a full conversation into one reply.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(&self, messages: &[Message]) -> Result<String, CompletionError>;

    fn endpoint(&self) -> &str;
}

pub fn new_client(config: &CompletionConfig) -> Result<Arc<dyn ChatClient>, CompletionError> {
    let client: Arc<dyn ChatClient> = match &config.transport {
        Transport::Proxy { .. } => Arc::new(ProxyChatClient::from_config(config)?),
        Transport::Direct { .. } => Arc::new(OpenAIChatClient::from_config(config)?),
    };
    Ok(client)
}

pub(crate) fn build_http(
    headers: HeaderMap,
    config: &CompletionConfig
) -> Result<HttpClient, CompletionError> {
    let mut builder = HttpClient::builder().default_headers(headers);
    if let Some(timeout) = config.timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

/// POSTs `payload` as JSON and pulls `choices[0].message.content` out of the
/// answer. Any non-2xx status is a failure; nothing is retried.
pub(crate) async fn post_completion(
    http: &HttpClient,
    url: &str,
    payload: &(impl Serialize + Sync)
) -> Result<String, CompletionError> {
    let resp = http.post(url).json(payload).send().await?;

    let status = resp.status();
    if !status.is_success() {
        return Err(CompletionError::Status(status));
    }

    let body = resp.text().await?;
    debug!("Completion endpoint {} answered with {} bytes", url, body.len());
    let parsed: ChatCompletionResponse = serde_json::from_str(&body)?;
    parsed.into_first_content()
}
