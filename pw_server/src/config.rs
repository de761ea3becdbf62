//! Server configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use player_wallet::{cache::CacheConfig, db::DatabaseConfig, wallet::WalletConfig};
use std::{fmt, net::SocketAddr, str::FromStr};

/// Default HTTP bind address
pub const DEFAULT_BIND: &str = "127.0.0.1:8080";

/// Minimum JWT secret length (128-bit security for hex secrets)
pub const MIN_JWT_SECRET_LEN: usize = 32;

/// Durable store backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

/// Snapshot cache backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    Redis,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            other => Err(ConfigError::Invalid {
                var: "WALLET_STORE".to_string(),
                reason: format!("Unknown store backend {other:?} (expected postgres or memory)"),
            }),
        }
    }
}

impl FromStr for CacheBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "redis" => Ok(Self::Redis),
            "memory" => Ok(Self::Memory),
            other => Err(ConfigError::Invalid {
                var: "WALLET_CACHE".to_string(),
                reason: format!("Unknown cache backend {other:?} (expected redis or memory)"),
            }),
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Postgres => write!(f, "postgres"),
            Self::Memory => write!(f, "memory"),
        }
    }
}

impl fmt::Display for CacheBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Redis => write!(f, "redis"),
            Self::Memory => write!(f, "memory"),
        }
    }
}

/// Command-line overrides, each taking precedence over its environment variable
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub bind: Option<SocketAddr>,
    pub database_url: Option<String>,
    pub redis_url: Option<String>,
    pub store: Option<StoreBackend>,
    pub cache: Option<CacheBackend>,
}

/// Complete server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind address
    pub bind: SocketAddr,
    /// Prometheus listener; metrics are disabled when unset
    pub metrics_bind: Option<SocketAddr>,
    pub store: StoreBackend,
    pub cache_backend: CacheBackend,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Redis configuration
    pub cache: CacheConfig,
    /// Ledger configuration
    pub wallet: WalletConfig,
    /// Security configuration
    pub security: SecurityConfig,
}

/// Security-related configuration
#[derive(Clone)]
pub struct SecurityConfig {
    /// JWT signing secret (required)
    pub jwt_secret: String,
}

impl fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("jwt_secret", &"<redacted>")
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `overrides` - Values given on the command line
    ///
    /// # Returns
    ///
    /// * `Result<ServerConfig, ConfigError>` - Loaded configuration or error
    ///
    /// # Errors
    ///
    /// Returns error if required variables are missing or invalid
    pub fn from_env(overrides: CliOverrides) -> Result<Self, ConfigError> {
        let bind = match overrides.bind {
            Some(bind) => bind,
            None => parse_addr("SERVER_BIND", std::env::var("SERVER_BIND").ok())?
                .unwrap_or(SocketAddr::from(([127, 0, 0, 1], 8080))),
        };

        let metrics_bind = parse_addr("METRICS_BIND", std::env::var("METRICS_BIND").ok())?;

        let store = match overrides.store {
            Some(store) => store,
            None => std::env::var("WALLET_STORE")
                .ok()
                .map(|v| v.parse::<StoreBackend>())
                .transpose()?
                .unwrap_or(StoreBackend::Postgres),
        };

        let cache_backend = match overrides.cache {
            Some(cache) => cache,
            None => std::env::var("WALLET_CACHE")
                .ok()
                .map(|v| v.parse::<CacheBackend>())
                .transpose()?
                .unwrap_or(CacheBackend::Redis),
        };

        // DATABASE_URL is only mandatory when PostgreSQL is actually used
        let mut database = match DatabaseConfig::from_env() {
            Ok(database) => database,
            Err(_) if overrides.database_url.is_some() || store == StoreBackend::Memory => {
                DatabaseConfig::default()
            }
            Err(_) => {
                return Err(ConfigError::MissingRequired {
                    var: "DATABASE_URL".to_string(),
                    hint: "Pass --db-url or run with --store memory".to_string(),
                });
            }
        };
        if let Some(url) = overrides.database_url {
            database.database_url = url;
        }

        let mut cache = CacheConfig::from_env();
        if let Some(url) = overrides.redis_url {
            cache.redis_url = url;
        }

        let wallet = WalletConfig::from_env().map_err(|e| ConfigError::Invalid {
            var: "DEFAULT_WALLET_BALANCE".to_string(),
            reason: e.to_string(),
        })?;

        // Security configuration (REQUIRED)
        let jwt_secret = std::env::var("JWT_SECRET").map_err(|_| ConfigError::MissingRequired {
            var: "JWT_SECRET".to_string(),
            hint: "Generate with: openssl rand -hex 32".to_string(),
        })?;

        let config = ServerConfig {
            bind,
            metrics_bind,
            store,
            cache_backend,
            database,
            cache,
            wallet,
            security: SecurityConfig { jwt_secret },
        };
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration after loading
    ///
    /// # Returns
    ///
    /// * `Result<(), ConfigError>` - Success or validation error
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.security.jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(ConfigError::Invalid {
                var: "JWT_SECRET".to_string(),
                reason: format!("Must be at least {MIN_JWT_SECRET_LEN} characters"),
            });
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid {
                var: "DB_MAX_CONNECTIONS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigError::Invalid {
                var: "DB_MIN_CONNECTIONS".to_string(),
                reason: format!(
                    "Cannot exceed max connections ({})",
                    self.database.max_connections
                ),
            });
        }

        if self.database.query_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                var: "DB_QUERY_TIMEOUT_MS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.cache.timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                var: "CACHE_TIMEOUT_MS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.wallet.lock_prune_threshold == 0 {
            return Err(ConfigError::Invalid {
                var: "WALLET_LOCK_PRUNE_THRESHOLD".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {var}\nHint: {hint}")]
    MissingRequired { var: String, hint: String },

    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

fn parse_addr(var: &str, value: Option<String>) -> Result<Option<SocketAddr>, ConfigError> {
    value
        .map(|v| {
            v.parse().map_err(|_| ConfigError::Invalid {
                var: var.to_string(),
                reason: format!("{v:?} is not an IP:PORT address"),
            })
        })
        .transpose()
}
