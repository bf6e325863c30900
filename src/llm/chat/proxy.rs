use async_trait::async_trait;
use log::debug;
use reqwest::{ Client as HttpClient, header::{ HeaderMap, HeaderValue, CONTENT_TYPE } };
use serde::Serialize;

use super::{ build_http, post_completion, ChatClient };
use crate::llm::{ CompletionConfig, CompletionError, Transport };
use crate::models::chat::Message;

/// Sends the conversation to an intermediary (e.g. an edge worker) that holds
/// the provider credentials. Model and token limit are the proxy's business.
pub struct ProxyChatClient {
    http: HttpClient,
    url: String,
}

#[derive(Serialize)]
struct ProxyRequest<'a> {
    messages: &'a [Message],
}

impl ProxyChatClient {
    pub fn new(url: &str, config: &CompletionConfig) -> Result<Self, CompletionError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Ok(Self {
            http: build_http(headers, config)?,
            url: url.to_string(),
        })
    }

    pub fn from_config(config: &CompletionConfig) -> Result<Self, CompletionError> {
        match &config.transport {
            Transport::Proxy { url } => Self::new(url, config),
            Transport::Direct { .. } =>
                Err(CompletionError::Request("proxy client built from a direct config".to_string())),
        }
    }
}

#[async_trait]
impl ChatClient for ProxyChatClient {
    async fn complete(&self, messages: &[Message]) -> Result<String, CompletionError> {
        debug!("Forwarding {} messages to proxy {}", messages.len(), self.url);
        post_completion(&self.http, &self.url, &ProxyRequest { messages }).await
    }

    fn endpoint(&self) -> &str {
        &self.url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_carries_only_messages() {
        let messages = vec![Message::system("sys")];
        let json = serde_json::to_value(ProxyRequest { messages: &messages }).unwrap();
        assert_eq!(json, serde_json::json!({ "messages": [{ "role": "system", "content": "sys" }] }));
    }
}
