use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub port: u16,
    pub data_dir: String,
    pub gemini: GeminiConfig,
    pub analyze: AnalyzeConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeConfig {
    pub max_retries: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub enabled: bool,
    pub max_entries: usize,
}

impl AppConfig {
    /// Load configuration from the environment. A `.env` file is honored
    /// when present; `GEMINI_API_KEY` is the only required variable.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let api_key = env::var("GEMINI_API_KEY").context("GEMINI_API_KEY must be set")?;

        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);
        let data_dir = env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string());
        let model = env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-1.5-flash".to_string());
        let base_url = env::var("GEMINI_BASE_URL")
            .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".to_string());

        let max_retries = env::var("ANALYZE_MAX_RETRIES")
            .ok()
            .and_then(|r| r.parse().ok())
            .unwrap_or(2);

        let cache_enabled = env::var("ANALYSIS_CACHE_ENABLED")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(true);
        let cache_max_entries = env::var("ANALYSIS_CACHE_MAX_ENTRIES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(1000);

        Ok(Self {
            port,
            data_dir,
            gemini: GeminiConfig {
                api_key,
                model,
                base_url,
            },
            analyze: AnalyzeConfig { max_retries },
            cache: CacheConfig {
                enabled: cache_enabled,
                max_entries: cache_max_entries,
            },
        })
    }
}
