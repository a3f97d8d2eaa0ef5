use anyhow::{Context, Result};

const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
const MAX_EVAL_CONCURRENCY: usize = 16;

/// Application configuration loaded from environment variables.
/// Built once at startup; missing credentials abort the process before it serves.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub smtp_host: String,
    pub smtp_username: String,
    pub smtp_password: String,
    pub report_from: String,
    pub default_report_recipient: Option<String>,
    pub llm_timeout_secs: u64,
    pub llm_max_attempts: u32,
    pub eval_concurrency: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Blank values count as missing.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &str| {
            get(key).with_context(|| format!("Required environment variable '{key}' is not set"))
        };

        let smtp_username = require("SMTP_USERNAME")?;

        Ok(Config {
            anthropic_api_key: require("ANTHROPIC_API_KEY")?,
            smtp_host: get("SMTP_HOST").unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string()),
            smtp_password: require("SMTP_PASSWORD")?,
            report_from: get("REPORT_FROM").unwrap_or_else(|| smtp_username.clone()),
            smtp_username,
            default_report_recipient: get("DEFAULT_REPORT_RECIPIENT"),
            llm_timeout_secs: parse_or(&get, "LLM_TIMEOUT_SECS", 120)?,
            llm_max_attempts: parse_or(&get, "LLM_MAX_ATTEMPTS", 1)?,
            eval_concurrency: parse_or(&get, "EVAL_CONCURRENCY", 1usize)?
                .clamp(1, MAX_EVAL_CONCURRENCY),
            port: parse_or(&get, "PORT", 8080)?,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_or<T>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}
