use anyhow::{bail, Result};
use std::env;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Staging,
    Prod,
}

impl Environment {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "prod" | "production" => Self::Prod,
            "staging" => Self::Staging,
            _ => Self::Dev,
        }
    }

    pub fn is_dev(&self) -> bool {
        matches!(self, Self::Dev)
    }

    pub fn is_prod(&self) -> bool {
        matches!(self, Self::Prod)
    }
}

/// Where listings are persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    /// Process-local storage, lost on restart
    Memory,
}

impl StorageBackend {
    pub fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            "memory" | "in-memory" => Ok(Self::Memory),
            other => bail!("Unknown STORAGE_BACKEND '{}'", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub env: Environment,
    pub server_addr: String,

    // Storage
    pub storage_backend: StorageBackend,
    pub database_url: Option<String>,
    pub database_max_connections: u32,

    // CORS
    pub cors_allow_origins: Vec<String>,

    // Startup
    pub seed_on_startup: bool,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Environment::from_str(&lookup("ENV").unwrap_or_else(|| "dev".to_string()));
        let server_addr = lookup("SERVER_ADDR").unwrap_or_else(|| "0.0.0.0:8080".to_string());

        // Storage
        let storage_backend = StorageBackend::from_str(
            &lookup("STORAGE_BACKEND").unwrap_or_else(|| "postgres".to_string()),
        )?;
        let database_url = lookup("DATABASE_URL");
        if storage_backend == StorageBackend::Postgres && database_url.is_none() {
            bail!("DATABASE_URL must be set when STORAGE_BACKEND=postgres");
        }
        let database_max_connections = lookup("DATABASE_MAX_CONNECTIONS")
            .and_then(|s| s.parse().ok())
            .unwrap_or(10);

        // CORS
        let cors_allow_origins = lookup("CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|| "http://localhost:3000".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let seed_on_startup = lookup("SEED_ON_STARTUP")
            .map(|s| !matches!(s.to_lowercase().as_str(), "0" | "false" | "no" | "off"))
            .unwrap_or(true);

        Ok(Settings {
            env,
            server_addr,
            storage_backend,
            database_url,
            database_max_connections,
            cors_allow_origins,
            seed_on_startup,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings_from(vars: &[(&str, &str)]) -> Result<Settings> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_require_database_url() {
        let err = settings_from(&[]).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn memory_backend_needs_no_database() {
        let settings = settings_from(&[("STORAGE_BACKEND", "memory")]).unwrap();
        assert_eq!(settings.storage_backend, StorageBackend::Memory);
        assert_eq!(settings.env, Environment::Dev);
        assert_eq!(settings.server_addr, "0.0.0.0:8080");
        assert_eq!(settings.database_max_connections, 10);
        assert_eq!(settings.cors_allow_origins, vec!["http://localhost:3000"]);
        assert!(settings.seed_on_startup);
    }

    #[test]
    fn parses_overrides() {
        let settings = settings_from(&[
            ("ENV", "production"),
            ("DATABASE_URL", "postgres://localhost/listings"),
            ("DATABASE_MAX_CONNECTIONS", "4"),
            ("CORS_ALLOW_ORIGINS", "http://a.test, ,http://b.test"),
            ("SEED_ON_STARTUP", "false"),
        ])
        .unwrap();

        assert!(settings.env.is_prod());
        assert_eq!(settings.storage_backend, StorageBackend::Postgres);
        assert_eq!(settings.database_max_connections, 4);
        assert_eq!(
            settings.cors_allow_origins,
            vec!["http://a.test", "http://b.test"]
        );
        assert!(!settings.seed_on_startup);
    }

    #[test]
    fn rejects_unknown_backend() {
        assert!(settings_from(&[("STORAGE_BACKEND", "redis")]).is_err());
    }
}
