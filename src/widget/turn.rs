use crate::agent::ChatAgent;
use crate::config::prompt::PromptConfig;
use crate::conversation::ConversationLog;
use crate::models::chat::Message;
use crate::models::websocket::Sender;
use crate::widget::panel::ChatPanel;

use log::{ debug, info, warn };
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Blank input, nothing happened.
    Ignored,
    Replied(String),
    /// The apology was shown instead of a reply.
    Failed(String),
}

/// Owns one session's conversation and panel and runs the submit sequence
/// against them. Taking `&mut self` means a session can only ever have one
/// turn in flight; callers that share a controller put it behind a mutex.
pub struct TurnController {
    log: ConversationLog,
    panel: ChatPanel,
    agent: ChatAgent,
    loading_message: String,
    apology: String,
}

impl TurnController {
    pub fn new(agent: ChatAgent, prompts: &PromptConfig, mut panel: ChatPanel) -> Self {
        if !prompts.welcome_message.is_empty() {
            panel.add_message(Sender::Ai, prompts.welcome_message.clone());
        }
        Self {
            log: ConversationLog::new(prompts.system_prompt.clone()),
            panel,
            agent,
            loading_message: prompts.loading_message.clone(),
            apology: prompts.apology_message.clone(),
        }
    }

    pub async fn submit(&mut self, input: &str) -> TurnOutcome {
        let text = input.trim();
        if text.is_empty() {
            return TurnOutcome::Ignored;
        }

        self.panel.add_message(Sender::User, text);
        self.panel.clear_input();
        self.log.append(Message::user(text));

        let loading_id = format!("loading-{}", Uuid::new_v4());
        self.panel.show_loading(loading_id.clone(), self.loading_message.clone());

        debug!("Turn started with {} messages in the log", self.log.len());
        let result = self.agent.respond(&mut self.log).await;

        if !self.panel.remove_loading(&loading_id) {
            warn!("Loading placeholder {} was already gone", loading_id);
        }

        match result {
            Ok(reply) => {
                self.panel.add_message(Sender::Ai, reply.clone());
                info!("Turn completed, log now holds {} messages", self.log.len());
                TurnOutcome::Replied(reply)
            }
            Err(e) => {
                self.agent.log_failure(&e);
                self.panel.add_message(Sender::Ai, self.apology.clone());
                TurnOutcome::Failed(self.apology.clone())
            }
        }
    }

    pub fn log(&self) -> &ConversationLog {
        &self.log
    }

    pub fn panel(&self) -> &ChatPanel {
        &self.panel
    }
}
