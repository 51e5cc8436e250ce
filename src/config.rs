use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub secret_key: String,
    pub host: String,
    pub port: u16,
    pub session_ttl_hours: i64,
    /// When set, status changes must follow the intake -> quote -> approval ->
    /// repair -> outcome sequence instead of accepting any known status.
    pub strict_status_transitions: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let secret_key = env::var("SECRET_KEY")
            .map_err(|_| anyhow::anyhow!("SECRET_KEY is not set"))?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let session_ttl_hours = env::var("SESSION_TTL_HOURS")
            .ok()
            .and_then(|h| h.parse::<i64>().ok())
            .filter(|h| *h > 0)
            .unwrap_or(12);
        let strict_status_transitions = env::var("STRICT_STATUS_TRANSITIONS")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        Ok(Self {
            port,
            database_url,
            secret_key,
            host,
            session_ttl_hours,
            strict_status_transitions,
        })
    }

    /// Configuration for tests and tools that do not read the environment.
    pub fn for_database(database_url: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            secret_key: secret_key.into(),
            host: "127.0.0.1".to_string(),
            port: 3000,
            session_ttl_hours: 12,
            strict_status_transitions: false,
        }
    }
}
