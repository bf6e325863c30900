pub mod chat;

use crate::cli::Args;
use reqwest::StatusCode;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_MAX_TOKENS: u32 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    Proxy,
    Direct,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportKind::Proxy => write!(f, "proxy"),
            TransportKind::Direct => write!(f, "direct"),
        }
    }
}

impl FromStr for TransportKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "proxy" => Ok(TransportKind::Proxy),
            "direct" => Ok(TransportKind::Direct),
            _ => Err(ConfigError::UnknownTransport(s.to_string())),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid transport: '{0}' (expected 'proxy' or 'direct')")]
    UnknownTransport(String),
    #[error("Proxy transport requires --proxy-url")]
    MissingProxyUrl,
    #[error("Direct transport requires --chat-api-key")]
    MissingApiKey,
    #[error("max tokens must be greater than zero")]
    ZeroMaxTokens,
}

/// Where completion requests go.
#[derive(Clone, PartialEq, Eq)]
pub enum Transport {
    Proxy {
        url: String,
    },
    Direct {
        base_url: String,
        api_key: String,
    },
}

// Hand-written so the key never lands in a log line.
impl fmt::Debug for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transport::Proxy { url } => f.debug_struct("Proxy").field("url", url).finish(),
            Transport::Direct { base_url, .. } =>
                f.debug_struct("Direct").field("base_url", base_url).field("api_key", &"***").finish(),
        }
    }
}

impl Transport {
    pub fn kind(&self) -> TransportKind {
        match self {
            Transport::Proxy { .. } => TransportKind::Proxy,
            Transport::Direct { .. } => TransportKind::Direct,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CompletionConfig {
    pub transport: Transport,
    pub model: String,
    pub max_tokens: u32,
    pub timeout: Option<Duration>,
}

impl CompletionConfig {
    pub fn proxy(url: impl Into<String>) -> Self {
        Self {
            transport: Transport::Proxy { url: url.into() },
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: None,
        }
    }

    pub fn direct(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            transport: Transport::Direct {
                base_url: base_url.into(),
                api_key: api_key.into(),
            },
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: None,
        }
    }

    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let kind: TransportKind = args.transport.parse()?;
        let transport = match kind {
            TransportKind::Proxy => {
                let url = args.proxy_url
                    .as_deref()
                    .map(str::trim)
                    .filter(|u| !u.is_empty())
                    .ok_or(ConfigError::MissingProxyUrl)?;
                Transport::Proxy { url: url.to_string() }
            }
            TransportKind::Direct => {
                let api_key = args.chat_api_key.trim();
                if api_key.is_empty() {
                    return Err(ConfigError::MissingApiKey);
                }
                Transport::Direct {
                    base_url: args.chat_base_url.clone(),
                    api_key: api_key.to_string(),
                }
            }
        };
        if args.max_tokens == 0 {
            return Err(ConfigError::ZeroMaxTokens);
        }

        Ok(Self {
            transport,
            model: args.chat_model.clone(),
            max_tokens: args.max_tokens,
            timeout: args.request_timeout_secs.map(Duration::from_secs),
        })
    }
}

/// Why a completion call produced no reply. Only used for logging and tests;
/// the user always sees the same apology.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("endpoint answered with status {0}")]
    Status(StatusCode),
    #[error("malformed response body: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("response contained no choices")]
    MissingContent,
    #[error("request could not be built: {0}")]
    Request(String),
}

impl CompletionError {
    pub fn kind(&self) -> &'static str {
        match self {
            CompletionError::Network(_) | CompletionError::Request(_) => "network",
            CompletionError::Status(_) => "http-status",
            CompletionError::Parse(_) | CompletionError::MissingContent => "parse",
        }
    }
}
