use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::shared::cache::DEFAULT_MAX_ENTRIES;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub dashboards: DashboardSettings,
    #[serde(default)]
    pub seed: SeedConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub path: String,
}

/// Session cache of the filter option loaders
#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    /// Lifetime of a cached entry; 0 disables caching
    pub ttl_secs: u64,
    /// Sessions held per cache before the oldest entry is dropped
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

fn default_max_entries() -> usize {
    DEFAULT_MAX_ENTRIES
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 600,
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DashboardSettings {
    /// Length of the customer ranking
    pub top_n: usize,
    pub histogram_bins: usize,
    /// Row cap of the customer detail table
    pub customer_detail_rows: usize,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            top_n: 10,
            histogram_bins: 20,
            customer_detail_rows: 20,
        }
    }
}

/// CSV files imported into empty warehouse tables at startup
#[derive(Debug, Deserialize, Clone, Default)]
pub struct SeedConfig {
    pub sales_csv: Option<String>,
    pub customers_csv: Option<String>,
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[server]
host = "127.0.0.1"
port = 3000

[database]
path = "target/db/warehouse.db"

[cache]
ttl_secs = 600
max_entries = 256

[dashboards]
top_n = 10
histogram_bins = 20
customer_detail_rows = 20
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                return parse_config(&contents);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    parse_config(DEFAULT_CONFIG)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let config: Config = toml::from_str(contents)?;
    Ok(config)
}

/// Resolve a configured path relative to the executable directory
pub fn resolve_path(path_str: &str) -> PathBuf {
    let path = Path::new(path_str);

    if path.is_absolute() {
        return path.to_path_buf();
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            return exe_dir.join(path);
        }
    }

    PathBuf::from(path_str)
}

/// Get the database file path from configuration
pub fn get_database_path(config: &Config) -> PathBuf {
    resolve_path(&config.database.path)
}
