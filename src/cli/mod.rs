use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Completion Transport Args ---
    /// How completion requests are sent: "proxy" (through an intermediary endpoint) or "direct" (to the provider)
    #[arg(long, env = "CHAT_TRANSPORT", default_value = "direct")]
    pub transport: String,

    /// Proxy endpoint URL. Required when --transport=proxy.
    #[arg(long, env = "CHAT_PROXY_URL")]
    pub proxy_url: Option<String>,

    /// Provider API key sent as a bearer token. Required when --transport=direct.
    #[arg(long, env = "CHAT_API_KEY", default_value = "", hide_env_values = true)]
    pub chat_api_key: String,

    /// Base URL of the provider API; /v1/chat/completions is appended
    #[arg(long, env = "CHAT_BASE_URL", default_value = "https://api.openai.com")]
    pub chat_base_url: String,

    /// Model identifier pinned on direct requests
    #[arg(long, env = "CHAT_MODEL", default_value = "gpt-4o")]
    pub chat_model: String,

    /// max_completion_tokens pinned on direct requests
    #[arg(long, env = "CHAT_MAX_TOKENS", default_value = "300")]
    pub max_tokens: u32,

    /// Optional timeout for a completion request, in seconds. Unset means wait indefinitely.
    #[arg(long, env = "CHAT_REQUEST_TIMEOUT_SECS")]
    pub request_timeout_secs: Option<u64>,

    // --- Widget Args ---
    /// Path to the prompt configuration file (system prompt, welcome, loading and apology texts).
    #[arg(long, env = "PROMPTS_PATH", default_value = "json/prompts.json")]
    pub prompts_path: String,

    /// Host address and port for the WebSocket server to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "127.0.0.1:4000")]
    pub server_addr: String,

    /// Host address and port for the HTTP server that serves the widget page.
    #[arg(long, env = "HTTP_ADDR", default_value = "127.0.0.1:8080")]
    pub http_addr: String,
}
