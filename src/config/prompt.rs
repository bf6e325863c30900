use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{ Path, PathBuf };
use std::sync::{ Arc, Mutex };
use std::time::SystemTime;
use log::{ info, warn, error };
use thiserror::Error;

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are L'Oréal's AI Beauty Assistant, a knowledgeable and friendly expert on L'Oréal products and beauty advice. Your role is to help users discover and understand L'Oréal's extensive range of products including makeup, skincare, haircare, and fragrances.

Guidelines for your responses:
- Only provide information about L'Oréal products, beauty routines, makeup tips, skincare advice, haircare solutions, and fragrance recommendations
- Be enthusiastic and knowledgeable about L'Oréal's product lines and their benefits
- Offer personalized recommendations when users describe their needs or concerns
- Politely redirect conversations that are not related to beauty, L'Oréal products, or beauty routines
- Keep responses helpful, concise, and friendly
- When you don't have specific product information, suggest users visit a L'Oréal store or website for the most up-to-date details

If someone asks about topics unrelated to L'Oréal, beauty, or personal care, politely say something like: \"I'm here to help you with L'Oréal beauty products and routines! What can I assist you with regarding makeup, skincare, haircare, or fragrances?\"";

pub const DEFAULT_WELCOME_MESSAGE: &str = "👋 Welcome to L'Oréal Beauty Assistant! I'm here to help you discover the perfect beauty products and routines. Whether you're looking for makeup tips, skincare advice, haircare solutions, or fragrance recommendations, I've got you covered! What can I help you with today?";

pub const DEFAULT_LOADING_MESSAGE: &str = "✨ Thinking about the perfect beauty solution for you...";

pub const DEFAULT_APOLOGY_MESSAGE: &str = "I apologize, but I'm having trouble connecting right now. Please try again in a moment, or visit a L'Oréal store for immediate assistance with your beauty needs!";

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("Prompt file IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Prompt JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Prompt field '{0}' must not be empty")]
    EmptyField(&'static str),
}

/// The fixed texts a session needs. Every field falls back to the built-in
/// default when absent from the file.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct PromptConfig {
    pub system_prompt: String,
    pub welcome_message: String,
    pub loading_message: String,
    pub apology_message: String,
    #[serde(skip)]
    pub last_loaded: Option<SystemTime>,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            welcome_message: DEFAULT_WELCOME_MESSAGE.to_string(),
            loading_message: DEFAULT_LOADING_MESSAGE.to_string(),
            apology_message: DEFAULT_APOLOGY_MESSAGE.to_string(),
            last_loaded: None,
        }
    }
}

impl PromptConfig {
    fn validate(&self) -> Result<(), PromptError> {
        if self.system_prompt.trim().is_empty() {
            return Err(PromptError::EmptyField("system_prompt"));
        }
        if self.apology_message.trim().is_empty() {
            return Err(PromptError::EmptyField("apology_message"));
        }
        Ok(())
    }
}

pub fn load_prompts<P: AsRef<Path>>(path: P) -> Result<Arc<PromptConfig>, PromptError> {
    let file_content = fs::read_to_string(&path)?;
    let mut config: PromptConfig = serde_json::from_str(&file_content)?;
    config.validate()?;
    config.last_loaded = Some(SystemTime::now());
    Ok(Arc::new(config))
}

/// Re-reads the file when its mtime is newer than `since`.
pub fn reload_prompts_if_changed<P: AsRef<Path>>(
    path: P,
    since: SystemTime
) -> Result<Option<Arc<PromptConfig>>, PromptError> {
    let metadata = fs::metadata(&path)?;

    if let Ok(modified) = metadata.modified() {
        if modified > since {
            info!("Prompts file changed, reloading...");
            return Ok(Some(load_prompts(path)?));
        }
    }
    Ok(None)
}

struct Loaded {
    config: Arc<PromptConfig>,
    checked_at: SystemTime,
}

/// Shared handle on the prompt file. Each new session asks for the current
/// config, which re-reads the file when it changed on disk. A file that fails
/// to parse is reported once per change and the previous config stays.
pub struct PromptStore {
    path: PathBuf,
    current: Mutex<Loaded>,
}

impl PromptStore {
    pub fn open<P: Into<PathBuf>>(path: P) -> Self {
        let path = path.into();
        let checked_at = SystemTime::now();
        let config = match load_prompts(&path) {
            Ok(config) => {
                info!("Loaded prompts from '{}'", path.display());
                config
            }
            Err(PromptError::IoError(e)) if e.kind() == io::ErrorKind::NotFound => {
                warn!("Prompts file '{}' not found, using built-in prompts", path.display());
                Arc::new(PromptConfig::default())
            }
            Err(e) => {
                error!("Failed to load prompts from '{}': {}. Using built-in prompts", path.display(), e);
                Arc::new(PromptConfig::default())
            }
        };
        Self { path, current: Mutex::new(Loaded { config, checked_at }) }
    }

    pub fn with_config(config: PromptConfig) -> Self {
        Self {
            path: PathBuf::new(),
            current: Mutex::new(Loaded { config: Arc::new(config), checked_at: SystemTime::now() }),
        }
    }

    pub fn current(&self) -> Arc<PromptConfig> {
        let mut guard = match self.current.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        if self.path.as_os_str().is_empty() || !self.path.exists() {
            return guard.config.clone();
        }
        let since = guard.checked_at;
        guard.checked_at = SystemTime::now();
        match reload_prompts_if_changed(&self.path, since) {
            Ok(Some(fresh)) => {
                guard.config = fresh;
            }
            Ok(None) => {}
            Err(e) => {
                error!("Failed to reload prompts from '{}': {}. Keeping previous prompts", self.path.display(), e);
            }
        }
        guard.config.clone()
    }
}
