use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub pagination: PaginationConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "db/shop.db".into(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directives, overridden by `RUST_LOG`
    pub filter: String,
    /// Directory of `backend.log`
    pub dir: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info,sqlx=warn,sea_orm=warn".into(),
            dir: "logs".into(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PaginationConfig {
    /// Page size used when `limit` is absent, zero or not a number
    pub default_limit: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self { default_limit: 5 }
    }
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[server]
host = "0.0.0.0"
port = 3000

[database]
path = "db/shop.db"

[logging]
filter = "info,sqlx=warn,sea_orm=warn"
dir = "logs"

[pagination]
default_limit = 5
"#;

/// Where the active configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Embedded,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::File(path) => write!(f, "{}", path.display()),
            ConfigSource::Embedded => write!(f, "embedded default"),
        }
    }
}

/// Load configuration from config.toml
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Current working directory
/// 3. Falls back to embedded default config
///
/// Runs before tracing is initialized, so the caller logs the returned source.
pub fn load_config() -> anyhow::Result<(Config, ConfigSource)> {
    let mut candidates = Vec::new();
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.push(exe_dir.join("config.toml"));
        }
    }
    if let Ok(cwd) = std::env::current_dir() {
        candidates.push(cwd.join("config.toml"));
    }

    for config_path in candidates {
        if config_path.exists() {
            let config = load_config_from(&config_path)?;
            return Ok((config, ConfigSource::File(config_path)));
        }
    }

    let config: Config = toml::from_str(DEFAULT_CONFIG)?;
    Ok((config, ConfigSource::Embedded))
}

pub fn load_config_from(path: &Path) -> anyhow::Result<Config> {
    let contents = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("invalid config {}: {}", path.display(), e))?;
    Ok(config)
}

/// Resolves a configured path. Relative paths are taken relative to the
/// executable directory, falling back to the working directory.
fn resolve_path(configured: &str) -> PathBuf {
    let path = Path::new(configured);
    if path.is_absolute() {
        return path.to_path_buf();
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            return exe_dir.join(path);
        }
    }

    PathBuf::from(configured)
}

/// Get the database file path from configuration
pub fn get_database_path(config: &Config) -> PathBuf {
    resolve_path(&config.database.path)
}

/// Get the log directory from configuration
pub fn get_log_dir(config: &Config) -> PathBuf {
    resolve_path(&config.logging.dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config: Result<Config, _> = toml::from_str(DEFAULT_CONFIG);
        assert!(config.is_ok());
        let config = config.unwrap();
        assert_eq!(config.database.path, "db/shop.db");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.pagination.default_limit, 5);
    }

    #[test]
    fn test_partial_config_falls_back_to_defaults() {
        let config: Config = toml::from_str(
            r#"
            [server]
            port = 8080
            "#,
        )
        .unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.logging.filter, "info,sqlx=warn,sea_orm=warn");
        assert_eq!(config.pagination.default_limit, 5);
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[database]\npath = \"/tmp/shop-test.db\"\n").unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.database.path, "/tmp/shop-test.db");
        assert_eq!(get_database_path(&config), PathBuf::from("/tmp/shop-test.db"));
    }

    #[test]
    fn test_relative_paths_resolve_next_to_exe() {
        let config = Config::default();
        let log_dir = get_log_dir(&config);
        assert!(log_dir.is_absolute());
        assert!(log_dir.ends_with("logs"));
        assert!(get_database_path(&config).ends_with("db/shop.db"));
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nport = \"not a port\"\n").unwrap();
        assert!(load_config_from(&path).is_err());
    }
}
