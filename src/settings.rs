//! Per-request settings lookup
//!
//! The API key and the server domain live in small files that operators edit
//! by hand while the server is running. They are read fresh on every call so
//! a change takes effect on the next request without a restart.

use crate::config::Config;
use std::fs;
use std::io;
use std::net::{IpAddr, ToSocketAddrs};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Sentinel used when no domain can be determined
pub const UNKNOWN_DOMAIN: &str = "unknown";

/// Source of the settings that may change between requests
pub trait SettingsProvider: Send + Sync + 'static {
    /// Key that the `auth` query parameter must equal
    ///
    /// `None` when the key cannot be determined; every request is then rejected.
    fn auth_key(&self) -> Option<String>;

    /// Domain reported for accounts when the CLI output does not carry one
    fn domain(&self) -> String;
}

/// Settings backed by the key and domain files on disk
pub struct FileSettings {
    api_key_file: PathBuf,
    domain_file: PathBuf,
    default_key: String,
}

impl FileSettings {
    pub fn new(api_key_file: PathBuf, domain_file: PathBuf, default_key: String) -> Self {
        Self {
            api_key_file,
            domain_file,
            default_key,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.paths.api_key_file.clone(),
            config.paths.domain_file.clone(),
            config.auth.default_key.clone(),
        )
    }

    /// Domain file contents, else `resolve`'s address, else [`UNKNOWN_DOMAIN`]
    fn domain_with<F>(&self, resolve: F) -> String
    where
        F: FnOnce() -> Option<IpAddr>,
    {
        match read_trimmed(&self.domain_file) {
            Ok(Some(domain)) if !domain.is_empty() => return domain,
            Ok(_) => debug!("No domain file at {}", self.domain_file.display()),
            Err(e) => warn!(
                "Failed to read domain file {}: {}",
                self.domain_file.display(),
                e
            ),
        }

        match resolve() {
            Some(ip) => ip.to_string(),
            None => UNKNOWN_DOMAIN.to_string(),
        }
    }
}

impl SettingsProvider for FileSettings {
    fn auth_key(&self) -> Option<String> {
        match read_trimmed(&self.api_key_file) {
            Ok(Some(key)) => Some(key),
            Ok(None) => Some(self.default_key.clone()),
            // The file exists, so the default key must not apply
            Err(e) => {
                warn!(
                    "Failed to read key file {}: {} (rejecting requests)",
                    self.api_key_file.display(),
                    e
                );
                None
            }
        }
    }

    fn domain(&self) -> String {
        self.domain_with(local_address)
    }
}

/// Fixed settings, for embedding and tests
#[derive(Debug, Clone)]
pub struct StaticSettings {
    pub auth_key: String,
    pub domain: String,
}

impl SettingsProvider for StaticSettings {
    fn auth_key(&self) -> Option<String> {
        Some(self.auth_key.clone())
    }

    fn domain(&self) -> String {
        self.domain.clone()
    }
}

/// Read a file and trim it, `None` if it does not exist
fn read_trimmed(path: &Path) -> io::Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content.trim().to_string())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// Resolve this machine's hostname to an address, preferring IPv4
fn local_address() -> Option<IpAddr> {
    let host = match hostname::get().map(|h| h.into_string()) {
        Ok(Ok(host)) => host,
        Ok(Err(_)) => {
            warn!("Hostname is not valid UTF-8");
            return None;
        }
        Err(e) => {
            warn!("Failed to get hostname: {}", e);
            return None;
        }
    };

    let addrs: Vec<IpAddr> = match (host.as_str(), 0).to_socket_addrs() {
        Ok(addrs) => addrs.map(|a| a.ip()).collect(),
        Err(e) => {
            warn!("Failed to resolve hostname {}: {}", host, e);
            return None;
        }
    };

    let ip = addrs
        .iter()
        .find(|ip| ip.is_ipv4())
        .or_else(|| addrs.first())
        .copied();
    debug!("Resolved local hostname {} -> {:?}", host, ip);
    ip
}
