//! Application configuration.
//!
//! Settings live in `config.json` inside the platform data directory (see
//! [`DataStorage`]). Every section is optional; a missing file or section
//! falls back to defaults. Secrets may instead come from the environment
//! (loaded from `.env` by the binary):
//!
//! | Variable             | Overrides                         |
//! |----------------------|-----------------------------------|
//! | `OPENROUTER_API_KEY` | `llm.api_key`, provider OpenRouter |
//! | `DEEPSEEK_API_KEY`   | `llm.api_key`, provider DeepSeek   |
//! | `LLM_MODEL`          | `llm.model`                        |
//! | `BOT_TOKEN`          | `telegram.bot_token`               |
//!
//! OpenRouter wins when both keys are present. Without any key the mock
//! analyzer answers instead of a real model.

use super::data_storage::DataStorage;
use crate::libs::messages::Message;
use crate::msg_print;
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Input, MultiSelect, Select};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{self, File};
use std::path::Path;

pub const CONFIG_FILE_NAME: &str = "config.json";

pub const DEFAULT_MODEL: &str = "deepseek/deepseek-chat-v3.1";

#[derive(Debug, Clone)]
pub struct ConfigModule {
    pub key: String,
    pub name: String,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    #[default]
    OpenRouter,
    DeepSeek,
}

impl LlmProvider {
    pub fn endpoint(&self) -> &'static str {
        match self {
            LlmProvider::OpenRouter => "https://openrouter.ai/api/v1/chat/completions",
            LlmProvider::DeepSeek => "https://api.deepseek.com/v1/chat/completions",
        }
    }
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LlmProvider::OpenRouter => write!(f, "openrouter"),
            LlmProvider::DeepSeek => write!(f, "deepseek"),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Request timeout in seconds.
    pub timeout: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        LlmConfig {
            provider: LlmProvider::OpenRouter,
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 800,
            temperature: 0.2,
            timeout: 60,
        }
    }
}

impl LlmConfig {
    /// Applies environment overrides to `base`.
    ///
    /// Returns `None` when no API key is known, meaning the mock analyzer
    /// should be used.
    pub fn resolve(base: Option<LlmConfig>, lookup: impl Fn(&str) -> Option<String>) -> Option<LlmConfig> {
        let mut llm = base.unwrap_or_default();
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty("OPENROUTER_API_KEY") {
            llm.provider = LlmProvider::OpenRouter;
            llm.api_key = key;
        } else if let Some(key) = non_empty("DEEPSEEK_API_KEY") {
            llm.provider = LlmProvider::DeepSeek;
            llm.api_key = key;
        }
        if let Some(model) = non_empty("LLM_MODEL") {
            llm.model = model;
        }

        if llm.api_key.trim().is_empty() {
            None
        } else {
            Some(llm)
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct TelegramConfig {
    pub bot_token: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Seconds between store reconciliations in `watch`.
    pub resync_interval_secs: u64,
    /// Render prompt timestamps in UTC instead of local time.
    pub display_utc: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        SchedulerConfig {
            resync_interval_secs: 30,
            display_utc: false,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct IngestConfig {
    pub max_file_size_mb: u64,
}

impl Default for IngestConfig {
    fn default() -> Self {
        IngestConfig { max_file_size_mb: 20 }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llm: Option<LlmConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub telegram: Option<TelegramConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduler: Option<SchedulerConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingest: Option<IngestConfig>,
}

impl Config {
    /// Reads the configuration from the data directory.
    pub fn read() -> Result<Config> {
        let path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        Self::read_from(&path)
    }

    /// Reads a configuration file; a missing file yields defaults.
    pub fn read_from(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let config_str = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_str)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let config_file = File::create(path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    /// LLM settings after environment overrides, `None` for the mock.
    pub fn llm_settings(&self) -> Option<LlmConfig> {
        LlmConfig::resolve(self.llm.clone(), |name| std::env::var(name).ok())
    }

    /// Bot token from `BOT_TOKEN` or the file.
    pub fn bot_token(&self) -> Option<String> {
        std::env::var("BOT_TOKEN")
            .ok()
            .or_else(|| self.telegram.as_ref().map(|t| t.bot_token.clone()))
            .filter(|token| !token.trim().is_empty())
    }

    pub fn scheduler_settings(&self) -> SchedulerConfig {
        self.scheduler.clone().unwrap_or_default()
    }

    pub fn ingest_settings(&self) -> IngestConfig {
        self.ingest.clone().unwrap_or_default()
    }

    /// Interactive setup wizard, seeded with the current values.
    pub fn init() -> Result<Self> {
        let mut config = Self::read().unwrap_or_default();

        let modules = vec![
            ConfigModule {
                key: "llm".to_string(),
                name: "LLM".to_string(),
            },
            ConfigModule {
                key: "telegram".to_string(),
                name: "Telegram".to_string(),
            },
            ConfigModule {
                key: "scheduler".to_string(),
                name: "Scheduler".to_string(),
            },
            ConfigModule {
                key: "ingest".to_string(),
                name: "Ingest".to_string(),
            },
        ];

        let selected = MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptSelectModules.to_string())
            .items(&modules.iter().map(|module| &module.name).collect::<Vec<_>>())
            .interact()?;

        for &selection in &selected {
            match modules[selection].key.as_str() {
                "llm" => {
                    let default = config.llm.clone().unwrap_or_default();
                    msg_print!(Message::ConfigModuleLlm);
                    let providers = [LlmProvider::OpenRouter, LlmProvider::DeepSeek];
                    let provider = Select::with_theme(&ColorfulTheme::default())
                        .with_prompt(Message::PromptLlmProvider.to_string())
                        .items(&providers)
                        .default(providers.iter().position(|p| *p == default.provider).unwrap_or(0))
                        .interact()?;
                    config.llm = Some(LlmConfig {
                        provider: providers[provider],
                        api_key: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptLlmApiKey.to_string())
                            .default(default.api_key)
                            .allow_empty(true)
                            .interact_text()?,
                        model: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptLlmModel.to_string())
                            .default(default.model)
                            .interact_text()?,
                        max_tokens: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptLlmMaxTokens.to_string())
                            .default(default.max_tokens)
                            .interact_text()?,
                        temperature: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptLlmTemperature.to_string())
                            .default(default.temperature)
                            .interact_text()?,
                        timeout: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptLlmTimeout.to_string())
                            .default(default.timeout)
                            .interact_text()?,
                    });
                }
                "telegram" => {
                    let default = config.telegram.clone().unwrap_or_default();
                    msg_print!(Message::ConfigModuleTelegram);
                    config.telegram = Some(TelegramConfig {
                        bot_token: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptBotToken.to_string())
                            .default(default.bot_token)
                            .interact_text()?,
                    });
                }
                "scheduler" => {
                    let default = config.scheduler.clone().unwrap_or_default();
                    msg_print!(Message::ConfigModuleScheduler);
                    config.scheduler = Some(SchedulerConfig {
                        resync_interval_secs: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptResyncInterval.to_string())
                            .default(default.resync_interval_secs)
                            .interact_text()?,
                        display_utc: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptDisplayUtc.to_string())
                            .default(default.display_utc)
                            .interact_text()?,
                    });
                }
                "ingest" => {
                    let default = config.ingest.clone().unwrap_or_default();
                    msg_print!(Message::ConfigModuleIngest);
                    config.ingest = Some(IngestConfig {
                        max_file_size_mb: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptMaxFileSize.to_string())
                            .default(default.max_file_size_mb)
                            .interact_text()?,
                    });
                }
                _ => {}
            }
        }

        Ok(config)
    }
}
