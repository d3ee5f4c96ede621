//! Configuration handling for the ZIVPN API

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub cli: CliConfig,
    pub paths: PathsConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to listen on, all interfaces by default
    pub bind: String,
    pub port: u16,
    /// Working directory the server pins itself to on startup
    pub workdir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Path of the account-management executable
    pub binary: PathBuf,
    /// Environment variable set to "1" to request API-friendly output
    pub api_env: String,
    /// Seconds before a hung invocation is killed; 0 waits forever
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub api_key_file: PathBuf,
    pub domain_file: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Key accepted when the key file is absent
    pub default_key: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 9999,
            workdir: PathBuf::from("/tmp"),
        }
    }
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("/usr/local/bin/zivpn"),
            api_env: "ZIVPN_API_MODE".to_string(),
            timeout_secs: 0,
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            api_key_file: PathBuf::from("/etc/zivpn/api_key"),
            domain_file: PathBuf::from("/etc/zivpn/domain"),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            default_key: "zivpn123".to_string(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Load config from an explicit path or the default locations
///
/// Search order: explicit path, `./zivpn-api.toml`, `~/.zivpn-api/config.toml`,
/// `/etc/zivpn/api.toml`. Falls back to defaults when none exist.
pub fn load_config(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    if let Some(path) = explicit {
        info!("Loading config from {}", path.display());
        return Config::load(path);
    }

    for candidate in candidate_paths() {
        debug!("Looking for config at {}", candidate.display());
        if candidate.exists() {
            info!("Loading config from {}", candidate.display());
            return Config::load(&candidate);
        }
    }

    info!("No config file found, using defaults");
    Ok(Config::default())
}

fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("zivpn-api.toml")];
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".zivpn-api").join("config.toml"));
    }
    paths.push(PathBuf::from("/etc/zivpn/api.toml"));
    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 9999);
        assert_eq!(config.server.bind, "0.0.0.0");
        assert_eq!(config.cli.binary, PathBuf::from("/usr/local/bin/zivpn"));
        assert_eq!(config.cli.timeout_secs, 0);
        assert_eq!(config.auth.default_key, "zivpn123");
        assert_eq!(config.paths.api_key_file, PathBuf::from("/etc/zivpn/api_key"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.server.port = 8080;
        config.cli.timeout_secs = 45;
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.server.port, 8080);
        assert_eq!(loaded.cli.timeout_secs, 45);
        assert_eq!(loaded.cli.api_env, "ZIVPN_API_MODE");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nport = 7000\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.server.port, 7000);
        assert_eq!(config.server.workdir, PathBuf::from("/tmp"));
        assert_eq!(config.auth.default_key, "zivpn123");
    }

    #[test]
    fn test_invalid_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server\nport = ").unwrap();

        let result = Config::load(&path);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_missing_explicit_file() {
        let dir = tempdir().unwrap();
        let result = load_config(Some(&dir.path().join("absent.toml")));
        assert!(matches!(result, Err(ConfigError::ReadError(_))));
    }
}
