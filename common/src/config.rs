// Configuration management with layered configuration (file, env)

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use sqlx::mysql::MySqlConnectOptions;
use std::path::Path;

/// Main settings structure containing all configuration options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub object_storage: ObjectStorageConfig,
    pub ad_slot: AdSlotConfig,
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Relational store connection settings.
///
/// The connection target is assembled from discrete parts rather than a
/// single URL so that credentials never need URL escaping.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub name: String,
    pub max_connections: u32,
    pub connect_timeout_seconds: u64,
    pub max_lifetime_seconds: u64,
}

impl DatabaseConfig {
    /// Connection options for the MySQL driver
    pub fn connect_options(&self) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name)
    }

    /// Connection string with the password redacted, for logs
    pub fn display_url(&self) -> String {
        format!(
            "mysql://{}:***@{}:{}/{}",
            self.user, self.host, self.port, self.name
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectStorageConfig {
    pub bucket: String,
    pub region: String,
    /// Custom endpoint for S3-compatible stores; AWS is used when absent
    pub endpoint: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub listing_url_expiry_seconds: u32,
    pub cache_url_expiry_seconds: u32,
    pub ad_url_expiry_seconds: u32,
    pub cache_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdSlotConfig {
    /// IANA time zone used to derive the current slot
    pub timezone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub log_level: String,
    pub json_logs: bool,
    pub metrics_port: Option<u16>,
}

impl Settings {
    /// Load configuration with layered precedence: defaults → file → env
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path("config")
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();

        let builder = Config::builder()
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Add local configuration (not committed to git)
            .add_source(File::from(config_dir.join("local.toml")).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            // Variable names used by the deployed functions
            .set_override_option("database.user", std::env::var("DB_USER").ok())?
            .set_override_option("database.password", std::env::var("DB_PASS").ok())?
            .set_override_option("database.host", std::env::var("DB_HOST").ok())?
            .set_override_option("database.name", std::env::var("DB_NAME").ok())?
            .set_override_option("object_storage.bucket", std::env::var("BUCKET_NAME").ok())?;

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("Server port must be greater than 0".to_string());
        }

        if self.database.host.is_empty() {
            return Err("Database host cannot be empty".to_string());
        }
        if self.database.name.is_empty() {
            return Err("Database name cannot be empty".to_string());
        }
        if self.database.max_connections == 0 {
            return Err("Database max_connections must be greater than 0".to_string());
        }

        let storage = &self.object_storage;
        if storage.bucket.is_empty() {
            return Err("Object storage bucket cannot be empty".to_string());
        }
        if storage.cache_key.is_empty() {
            return Err("Object storage cache_key cannot be empty".to_string());
        }
        if storage.listing_url_expiry_seconds == 0
            || storage.cache_url_expiry_seconds == 0
            || storage.ad_url_expiry_seconds == 0
        {
            return Err("Signed URL expiries must be greater than 0".to_string());
        }
        if storage.access_key.is_some() != storage.secret_key.is_some() {
            return Err("Object storage access_key and secret_key must be set together".to_string());
        }

        self.ad_slot.tz()?;

        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            object_storage: ObjectStorageConfig::default(),
            ad_slot: AdSlotConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            user: "valuesmart".to_string(),
            password: String::new(),
            host: "localhost".to_string(),
            port: 3306,
            name: "valuesmart".to_string(),
            max_connections: 10,
            connect_timeout_seconds: 5,
            // RDS drops idle connections after a few minutes
            max_lifetime_seconds: 300,
        }
    }
}

impl Default for ObjectStorageConfig {
    fn default() -> Self {
        Self {
            bucket: "valuesmart".to_string(),
            region: "us-east-1".to_string(),
            endpoint: None,
            access_key: None,
            secret_key: None,
            listing_url_expiry_seconds: 300,
            cache_url_expiry_seconds: 60,
            ad_url_expiry_seconds: 300,
            cache_key: "division_marketsegment.json".to_string(),
        }
    }
}

impl Default for AdSlotConfig {
    fn default() -> Self {
        Self {
            timezone: "UTC".to_string(),
        }
    }
}

impl AdSlotConfig {
    pub fn tz(&self) -> Result<chrono_tz::Tz, String> {
        self.timezone
            .parse()
            .map_err(|_| format!("Unknown ad slot timezone: {}", self.timezone))
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: true,
            metrics_port: None,
        }
    }
}
