//! # Bot Configuration Module
//!
//! This module defines configuration structures for the bot, including
//! external service settings, pagination and booster presentation.

use anyhow::{anyhow, Context, Result};

// Constants for bot configuration
pub const PAGE_SIZE: usize = 25;
pub const DEFAULT_FOIL_PROBABILITY: f64 = 1.0 / 91.0;
pub const DEFAULT_PRESENCE: &str = "Hearthstone";
pub const DEFAULT_ENV_FILE: &str = ".env";
pub const DEFAULT_CARD_API_URL: &str = "https://api.magicthegathering.io/v1";
pub const DEFAULT_GATHERER_URL: &str = "http://gatherer.wizards.com";
pub const DEFAULT_GOLDFISH_URL: &str = "https://www.mtggoldfish.com";

/// Settings shared by every external collaborator
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Timeout for a single HTTP request in seconds
    pub request_timeout_secs: u64,
    /// Circuit breaker failure threshold
    pub circuit_breaker_threshold: u32,
    /// Circuit breaker reset timeout in seconds
    pub circuit_breaker_reset_secs: u64,
    /// Upper bound on result pages fetched for one filter search
    pub max_search_pages: u32,
    /// Card database REST API base URL
    pub card_api_url: String,
    /// Gatherer base URL, used for partial-name search and card links
    pub gatherer_url: String,
    /// MTGGoldfish base URL, used for prices
    pub goldfish_url: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 10,
            circuit_breaker_threshold: 5,
            circuit_breaker_reset_secs: 60, // 1 minute
            max_search_pages: 20,
            card_api_url: DEFAULT_CARD_API_URL.to_string(),
            gatherer_url: DEFAULT_GATHERER_URL.to_string(),
            goldfish_url: DEFAULT_GOLDFISH_URL.to_string(),
        }
    }
}

/// Top-level configuration for the bot
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Chance that a generated booster card is shown as foil
    pub foil_probability: f64,
    /// Maximum entries per list reply
    pub page_size: usize,
    /// Presence label set at startup
    pub presence: String,
    pub services: ServiceConfig,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            foil_probability: DEFAULT_FOIL_PROBABILITY,
            page_size: PAGE_SIZE,
            presence: DEFAULT_PRESENCE.to_string(),
            services: ServiceConfig::default(),
        }
    }
}

impl BotConfig {
    /// Build a configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = BotConfig::default();

        if let Some(raw) = lookup("FOIL_PROBABILITY") {
            let probability: f64 = raw
                .trim()
                .parse()
                .with_context(|| format!("FOIL_PROBABILITY is not a number: {raw}"))?;
            if !(0.0..=1.0).contains(&probability) {
                return Err(anyhow!(
                    "FOIL_PROBABILITY must be between 0 and 1, got {probability}"
                ));
            }
            config.foil_probability = probability;
        }

        if let Some(presence) = lookup("BOT_PRESENCE") {
            if !presence.trim().is_empty() {
                config.presence = presence.trim().to_string();
            }
        }

        if let Some(raw) = lookup("HTTP_TIMEOUT_SECS") {
            config.services.request_timeout_secs = raw
                .trim()
                .parse()
                .with_context(|| format!("HTTP_TIMEOUT_SECS is not a number: {raw}"))?;
        }

        if let Some(raw) = lookup("MAX_SEARCH_PAGES") {
            config.services.max_search_pages = raw
                .trim()
                .parse()
                .with_context(|| format!("MAX_SEARCH_PAGES is not a number: {raw}"))?;
        }

        if let Some(url) = lookup("CARD_API_URL") {
            config.services.card_api_url = url.trim_end_matches('/').to_string();
        }
        if let Some(url) = lookup("GATHERER_URL") {
            config.services.gatherer_url = url.trim_end_matches('/').to_string();
        }
        if let Some(url) = lookup("GOLDFISH_URL") {
            config.services.goldfish_url = url.trim_end_matches('/').to_string();
        }

        Ok(config)
    }
}

/// Load the local secrets file and return the bot token
///
/// The file path defaults to `.env` and can be overridden with `CARDBOT_ENV_FILE`.
/// A missing file is not an error as long as the token is already in the environment.
pub fn load_bot_token() -> Result<String> {
    let env_file =
        std::env::var("CARDBOT_ENV_FILE").unwrap_or_else(|_| DEFAULT_ENV_FILE.to_string());
    dotenv::from_filename(&env_file).ok();

    std::env::var("TELEGRAM_BOT_TOKEN")
        .map(|token| token.trim().to_string())
        .ok()
        .filter(|token| !token.is_empty())
        .ok_or_else(|| anyhow!("TELEGRAM_BOT_TOKEN must be set (looked in {env_file})"))
}
