use seatline_core::BookingPolicy;
use serde::Deserialize;
use std::env;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub booking: BookingRules,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory served for any path no route matches.
    pub static_dir: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    Postgres,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    #[serde(default = "default_backend")]
    pub backend: StorageBackend,
    pub url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default = "default_statement_timeout")]
    pub statement_timeout_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BookingRules {
    #[serde(default = "default_persist_attempts")]
    pub persist_attempts: u32,
    #[serde(default = "default_retry_backoff")]
    pub retry_backoff_ms: u64,
    #[serde(default = "default_seed_on_startup")]
    pub seed_on_startup: bool,
}

fn default_port() -> u16 { 5000 }
fn default_backend() -> StorageBackend { StorageBackend::Memory }
fn default_max_connections() -> u32 { 5 }
fn default_acquire_timeout() -> u64 { 3 }
fn default_statement_timeout() -> u64 { 5000 }
fn default_persist_attempts() -> u32 { 3 }
fn default_retry_backoff() -> u64 { 50 }
fn default_seed_on_startup() -> bool { true }

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: default_port(), static_dir: None }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            url: None,
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout(),
            statement_timeout_ms: default_statement_timeout(),
        }
    }
}

impl Default for BookingRules {
    fn default() -> Self {
        Self {
            persist_attempts: default_persist_attempts(),
            retry_backoff_ms: default_retry_backoff(),
            seed_on_startup: default_seed_on_startup(),
        }
    }
}

impl BookingRules {
    pub fn policy(&self) -> BookingPolicy {
        BookingPolicy {
            persist_attempts: self.persist_attempts.max(1),
            retry_backoff: Duration::from_millis(self.retry_backoff_ms),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            // Optional per-environment overrides
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg.. `SEATLINE__SERVER__PORT=8080`
            .add_source(
                config::Environment::with_prefix("SEATLINE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{File, FileFormat};

    fn parse(toml: &str) -> Config {
        config::Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults_fill_missing_sections() {
        let config = parse("[server]\nport = 8080\n");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.backend, StorageBackend::Memory);
        assert_eq!(config.booking.persist_attempts, 3);
        assert!(config.booking.seed_on_startup);
    }

    #[test]
    fn test_postgres_backend_and_policy() {
        let config = parse(
            r#"
            [database]
            backend = "postgres"
            url = "postgres://localhost/seatline"
            statement_timeout_ms = 2000

            [booking]
            persist_attempts = 0
            retry_backoff_ms = 10
            "#,
        );
        assert_eq!(config.database.backend, StorageBackend::Postgres);
        assert_eq!(config.database.statement_timeout_ms, 2000);

        let policy = config.booking.policy();
        assert_eq!(policy.persist_attempts, 1);
        assert_eq!(policy.retry_backoff, Duration::from_millis(10));
    }
}
