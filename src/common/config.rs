// src/common/config.rs
//! Process configuration read from the environment at startup

use std::env;
use std::time::Duration;
use tracing::warn;

const DEFAULT_JWT_SECRET: &str = "replace_with_strong_secret";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub database_acquire_timeout: Duration,
    pub jwt_secret: String,
    pub openai_base_url: String,
    pub openai_timeout: Duration,
    pub finetune_model: String,
    pub cors_origins: Vec<String>,
    pub encryption_master_key: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            warn!("JWT_SECRET not set, falling back to the development secret");
            DEFAULT_JWT_SECRET.to_string()
        });

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "https://modeltunerai.com,http://localhost:3000".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Self {
            port: parse_or("PORT", 4000),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://modeltuner.db".to_string()),
            database_acquire_timeout: Duration::from_secs(parse_or(
                "DATABASE_ACQUIRE_TIMEOUT_SECS",
                5,
            )),
            jwt_secret,
            openai_base_url: env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com".to_string()),
            openai_timeout: Duration::from_secs(parse_or("OPENAI_TIMEOUT_SECS", 60)),
            finetune_model: env::var("OPENAI_FINETUNE_MODEL")
                .unwrap_or_else(|_| "gpt-3.5-turbo".to_string()),
            cors_origins,
            encryption_master_key: env::var("ENCRYPTION_MASTER_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
        }
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}
