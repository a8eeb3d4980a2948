//! Mount configuration.
//!
//! Parameters are fixed for the life of a mount: the resolver endpoint, the
//! directory under which the per-record-type mountpoints live, and the
//! options handed to the FUSE transport.

use std::net::{AddrParseError, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use dnsfs_types::RecordType;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration shared by every engine instance of one dnsfs process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MountConfig {
    /// Resolver endpoint (host:port) all queries go to.
    #[serde(default = "default_resolver")]
    pub resolver: String,

    /// Directory under which one mountpoint per record type is created.
    #[serde(default = "default_mount_base")]
    pub mount_base: PathBuf,

    /// Whether to pass `-o allow_other` to the FUSE transport.
    #[serde(default = "default_true")]
    pub allow_other: bool,

    /// Filesystem identifier tag (`-o fsname=`).
    #[serde(default = "default_fsname")]
    pub fsname: String,

    /// Whether to enable FUSE debug tracing (`-o debug`).
    #[serde(default = "default_true")]
    pub debug: bool,

    /// Per-query time budget in seconds; 0 leaves queries unbounded, which
    /// stalls the requesting operation for as long as the resolver stalls.
    #[serde(default)]
    pub query_timeout_secs: u64,
}

fn default_resolver() -> String {
    "9.9.9.9:53".to_string()
}

fn default_mount_base() -> PathBuf {
    PathBuf::from("/tmp/dnsfs")
}

fn default_fsname() -> String {
    "dnsfs".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for MountConfig {
    fn default() -> Self {
        Self {
            resolver: default_resolver(),
            mount_base: default_mount_base(),
            allow_other: default_true(),
            fsname: default_fsname(),
            debug: default_true(),
            query_timeout_secs: 0,
        }
    }
}

/// Errors loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid resolver address {addr:?}: {source}")]
    Resolver {
        addr: String,
        source: AddrParseError,
    },
}

impl MountConfig {
    /// Load a TOML configuration file; absent keys keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.resolver_addr()?;
        Ok(config)
    }

    /// The resolver endpoint as a socket address.
    pub fn resolver_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.resolver.parse().map_err(|source| ConfigError::Resolver {
            addr: self.resolver.clone(),
            source,
        })
    }

    /// The per-query time budget, `None` when unbounded.
    pub fn query_timeout(&self) -> Option<Duration> {
        (self.query_timeout_secs != 0).then(|| Duration::from_secs(self.query_timeout_secs))
    }

    /// The mountpoint serving `rtype`: `<mount_base>/<RECORD_TYPE>`.
    pub fn mountpoint_for(&self, rtype: RecordType) -> PathBuf {
        self.mount_base.join(rtype.as_str())
    }

    /// The option string handed to the FUSE transport.
    pub fn mount_options(&self) -> String {
        let mut options = Vec::new();
        if self.allow_other {
            options.push("allow_other".to_string());
        }
        options.push(format!("fsname={}", self.fsname));
        if self.debug {
            options.push("debug".to_string());
        }
        options.join(",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MountConfig::default();
        assert_eq!(config.resolver, "9.9.9.9:53");
        assert_eq!(config.mount_base, PathBuf::from("/tmp/dnsfs"));
        assert!(config.allow_other);
        assert_eq!(config.fsname, "dnsfs");
        assert!(config.debug);
        assert_eq!(config.query_timeout_secs, 0);
        assert!(config.query_timeout().is_none());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: MountConfig = toml::from_str(
            r#"
            resolver = "127.0.0.1:5353"
            query_timeout_secs = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.resolver, "127.0.0.1:5353");
        assert_eq!(config.query_timeout(), Some(Duration::from_secs(5)));
        assert!(config.allow_other);
        assert_eq!(config.fsname, "dnsfs");
    }

    #[test]
    fn test_resolver_addr_parses() {
        let config = MountConfig::default();
        let addr = config.resolver_addr().unwrap();
        assert_eq!(addr.port(), 53);
    }

    #[test]
    fn test_resolver_addr_rejects_garbage() {
        let config = MountConfig {
            resolver: "not-an-address".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.resolver_addr(),
            Err(ConfigError::Resolver { .. })
        ));
    }

    #[test]
    fn test_mountpoint_for() {
        let config = MountConfig::default();
        assert_eq!(
            config.mountpoint_for(RecordType::AAAA),
            PathBuf::from("/tmp/dnsfs/AAAA")
        );
    }

    #[test]
    fn test_mount_options_rendering() {
        let config = MountConfig::default();
        assert_eq!(config.mount_options(), "allow_other,fsname=dnsfs,debug");

        let quiet = MountConfig {
            allow_other: false,
            debug: false,
            ..Default::default()
        };
        assert_eq!(quiet.mount_options(), "fsname=dnsfs");
    }
}
