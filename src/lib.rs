pub mod agent;
pub mod cli;
pub mod config;
pub mod conversation;
pub mod llm;
pub mod models;
pub mod server;
pub mod widget;

use agent::ChatAgent;
use cli::Args;
use config::prompt::PromptStore;
use llm::CompletionConfig;
use log::info;
use server::Server;
use std::error::Error;
use std::sync::Arc;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    let completion = CompletionConfig::from_args(&args)?;

    info!("--- Core Configuration ---");
    info!("WebSocket Address: {}", args.server_addr);
    info!("HTTP Address: {}", args.http_addr);
    info!("Transport: {}", completion.transport.kind());
    match &completion.transport {
        llm::Transport::Proxy { url } => info!("Proxy URL: {}", url),
        llm::Transport::Direct { base_url, .. } => info!("Provider Base URL: {}", base_url),
    }
    info!("Model: {}", completion.model);
    info!("Max Completion Tokens: {}", completion.max_tokens);
    match completion.timeout {
        Some(t) => info!("Request Timeout: {}s", t.as_secs()),
        None => info!("Request Timeout: none"),
    }
    info!("Prompts Path: {}", args.prompts_path);
    info!("-------------------------");

    let prompts = Arc::new(PromptStore::open(&args.prompts_path));
    let agent = ChatAgent::from_config(&completion, prompts.current().apology_message.clone())?;

    let server = Server::new(agent, prompts, args.clone());
    server.run().await?;

    Ok(())
}
