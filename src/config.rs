use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub metadata: MetadataConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// `production`, `development` or `test`. Gates the auth backdoor.
    pub environment: String,

    pub database_path: String,

    pub log_level: String,

    #[serde(default)]
    pub suppress_connection_errors: bool,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,

    /// Maximum database connections (default: 5)
    pub max_db_connections: u32,

    /// Minimum database connections (default: 1)
    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            database_path: "sqlite:data/pantry.db".to_string(),
            log_level: "info".to_string(),
            suppress_connection_errors: false,
            worker_threads: 2,
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,

    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 5287,
            cors_allowed_origins: vec!["*".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Accept `x-user-id` / `x-scopes` headers as a fake authenticated
    /// principal. Never valid in the production environment.
    pub backdoor_enabled: bool,

    pub jwt_issuer: String,

    pub jwt_audience: String,

    /// HS256 signing secret for bearer token validation.
    pub jwt_secret: String,

    /// Scope a token must carry to reach the API. Empty disables the check.
    pub required_scope: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            backdoor_enabled: false,
            jwt_issuer: "https://pantry.example.com/".to_string(),
            jwt_audience: "pantry-api".to_string(),
            jwt_secret: String::new(),
            required_scope: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataConfig {
    /// Fetch missing product facts from Open Food Facts on metadata lookups.
    pub enrichment_enabled: bool,

    pub food_facts_url: String,

    pub request_timeout_seconds: u64,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            enrichment_enabled: false,
            food_facts_url: "https://world.openfoodfacts.org/api/v2/product".to_string(),
            request_timeout_seconds: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,

    pub loki_enabled: bool,

    pub loki_url: String,

    pub loki_labels: std::collections::HashMap<String, String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        let mut labels = std::collections::HashMap::new();
        labels.insert("app".to_string(), "pantry".to_string());

        Self {
            metrics_enabled: true,
            loki_enabled: false,
            loki_url: "http://localhost:3100".to_string(),
            loki_labels: labels,
        }
    }
}

impl Config {
    /// Loads the config from `PANTRY_CONFIG`, `./config.toml` or the platform
    /// config directory, falling back to defaults when no file exists.
    pub fn load() -> Result<Self> {
        if let Ok(path) = std::env::var("PANTRY_CONFIG") {
            return Self::load_from(Path::new(&path));
        }

        let local = Path::new("config.toml");
        if local.exists() {
            return Self::load_from(local);
        }

        let fallback = Self::default_config_path();
        if fallback.exists() {
            return Self::load_from(&fallback);
        }

        Ok(Self::default())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pantry")
            .join("config.toml")
    }

    pub fn validate(&self) -> Result<()> {
        if self.general.max_db_connections < self.general.min_db_connections {
            bail!("general.max_db_connections must be >= general.min_db_connections");
        }

        if self.auth.backdoor_enabled && self.general.environment == "production" {
            bail!("auth.backdoor_enabled must not be set in the production environment");
        }

        if !self.auth.backdoor_enabled && self.auth.jwt_secret.is_empty() {
            bail!("auth.jwt_secret is required when the auth backdoor is disabled");
        }

        if self.observability.loki_enabled {
            url::Url::parse(&self.observability.loki_url)
                .context("observability.loki_url is not a valid URL")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid_for_development() {
        let mut config = Config::default();
        config.auth.backdoor_enabled = true;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn backdoor_is_rejected_in_production() {
        let mut config = Config::default();
        config.auth.backdoor_enabled = true;
        config.general.environment = "production".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn jwt_secret_is_required_without_backdoor() {
        let config = Config::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn parses_partial_toml() {
        let config: Config = toml::from_str(
            r#"
            [general]
            environment = "test"
            database_path = "sqlite::memory:"

            [auth]
            backdoor_enabled = true
            "#,
        )
        .unwrap();

        assert_eq!(config.general.environment, "test");
        assert!(config.auth.backdoor_enabled);
        assert_eq!(config.server.port, 5287);
    }
}
