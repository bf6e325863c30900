use crate::conversation::ConversationLog;
use crate::llm::chat::{ new_client, ChatClient };
use crate::llm::{ CompletionConfig, CompletionError };
use crate::models::chat::Message;

use log::{ info, error };
use std::sync::Arc;

/// Wraps a completion backend with the session-facing policy: successful
/// replies are recorded in the log, every failure becomes the same apology.
#[derive(Clone)]
pub struct ChatAgent {
    chat_client: Arc<dyn ChatClient>,
    apology: String,
}

impl ChatAgent {
    pub fn new(chat_client: Arc<dyn ChatClient>, apology: impl Into<String>) -> Self {
        Self { chat_client, apology: apology.into() }
    }

    pub fn from_config(
        config: &CompletionConfig,
        apology: impl Into<String>
    ) -> Result<Self, CompletionError> {
        let chat_client = new_client(config)?;
        info!(
            "Chat client configured: Transport={}, Endpoint={}, Model={}, MaxTokens={}",
            config.transport.kind(),
            chat_client.endpoint(),
            config.model,
            config.max_tokens
        );
        Ok(Self::new(chat_client, apology))
    }

    /// Sends the whole log and, on success, appends the reply as an assistant
    /// message before returning it. The log is left untouched on failure.
    pub async fn respond(&self, log: &mut ConversationLog) -> Result<String, CompletionError> {
        let reply = self.chat_client.complete(log.to_request_payload()).await?;
        log.append(Message::assistant(reply.clone()));
        Ok(reply)
    }

    /// Same as [`respond`](Self::respond) but never fails: the error is
    /// logged and the fixed apology is returned instead.
    pub async fn complete(&self, log: &mut ConversationLog) -> String {
        match self.respond(log).await {
            Ok(reply) => reply,
            Err(e) => {
                self.log_failure(&e);
                self.apology.clone()
            }
        }
    }

    pub fn log_failure(&self, e: &CompletionError) {
        error!("Error calling completion endpoint ({}): {}", e.kind(), e);
    }
}
