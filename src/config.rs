use std::net::IpAddr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub webhook_timeout: Duration,
    /// Thread follow-up notifications under the first one for a group.
    pub threads_enabled: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env_required("DATABASE_URL")?;

        let host: IpAddr = env_or("ACTIONFLOW_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid ACTIONFLOW_HOST: {e}"))?;

        let port: u16 = env_or("ACTIONFLOW_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid ACTIONFLOW_PORT: {e}"))?;

        let log_level = env_or("ACTIONFLOW_LOG_LEVEL", "info");

        let webhook_timeout_secs: u64 = env_or("ACTIONFLOW_WEBHOOK_TIMEOUT_SECS", "30")
            .parse()
            .map_err(|e| format!("Invalid ACTIONFLOW_WEBHOOK_TIMEOUT_SECS: {e}"))?;

        let threads_enabled = parse_bool(&env_or("ACTIONFLOW_THREADS_ENABLED", "true"))
            .ok_or_else(|| "Invalid ACTIONFLOW_THREADS_ENABLED: expected true or false".to_string())?;

        Ok(Config {
            database_url,
            host,
            port,
            log_level,
            webhook_timeout: Duration::from_secs(webhook_timeout_secs),
            threads_enabled,
        })
    }
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
