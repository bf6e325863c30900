pub mod api;
pub mod websocket;

use crate::agent::ChatAgent;
use crate::cli::Args;
use crate::config::prompt::PromptStore;
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;

pub struct Server {
    agent: ChatAgent,
    prompts: Arc<PromptStore>,
    args: Args,
}

impl Server {
    pub fn new(
        agent: ChatAgent,
        prompts: Arc<PromptStore>,
        args: Args,
    ) -> Self {
        Self {
            agent,
            prompts,
            args,
        }
    }

    pub async fn run(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let ws_port = self.args.server_addr
            .parse::<SocketAddr>()
            .map_err(|e| format!("Invalid --server-addr '{}': {}", self.args.server_addr, e))?
            .port();

        api::start_http_server(&self.args.http_addr, ws_port).await?;
        websocket::start_ws_server(
            &self.args.server_addr,
            self.agent.clone(),
            self.prompts.clone(),
        ).await
    }
}
