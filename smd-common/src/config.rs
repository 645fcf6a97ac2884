//! Configuration loading
//!
//! Settings resolve in priority order:
//! 1. Command-line argument or its environment variable (merged by the binary)
//! 2. TOML config file
//! 3. Compiled default

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::flow::FlowOptions;
use crate::{Error, Result};

pub const DEFAULT_PORT: u16 = 5790;
pub const DEFAULT_BIND: &str = "127.0.0.1";

/// Contents of `config.toml`; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TomlConfig {
    pub database: Option<PathBuf>,
    pub bind: Option<String>,
    pub port: Option<u16>,
    pub flow: FlowOptions,
}

/// Values given on the command line (or their environment variables)
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub database: Option<PathBuf>,
    pub bind: Option<String>,
    pub port: Option<u16>,
    pub topic_limit: Option<usize>,
}

/// Fully resolved settings of the chart service
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub database: PathBuf,
    pub bind: String,
    pub port: u16,
    pub flow: FlowOptions,
}

impl ServiceConfig {
    /// Merge overrides over the file over compiled defaults
    pub fn resolve(overrides: &Overrides, file: Option<TomlConfig>) -> Result<Self> {
        let file = file.unwrap_or_default();

        let mut flow = file.flow;
        if let Some(limit) = overrides.topic_limit {
            flow.topic_limit = limit;
        }
        if flow.root_label.trim().is_empty() {
            return Err(Error::Config("flow.root_label must not be empty".to_string()));
        }

        Ok(Self {
            database: overrides
                .database
                .clone()
                .or(file.database)
                .unwrap_or_else(default_database_path),
            bind: overrides
                .bind
                .clone()
                .or(file.bind)
                .unwrap_or_else(|| DEFAULT_BIND.to_string()),
            port: overrides.port.or(file.port).unwrap_or(DEFAULT_PORT),
            flow,
        })
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.bind, self.port)
            .parse()
            .map_err(|e| Error::Config(format!("invalid bind address '{}': {}", self.bind, e)))
    }
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("failed to parse {}: {}", path.display(), e)))
}

/// Load the config file if there is one.
///
/// An explicitly named file must exist. The default location is optional: a
/// missing file logs a warning and the compiled defaults apply.
pub fn load_optional_config(explicit: Option<&Path>) -> Result<Option<TomlConfig>> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(Error::Config(format!("config file not found: {}", path.display())));
        }
        info!("Loading config from {}", path.display());
        return load_toml_config(path).map(Some);
    }

    match default_config_path() {
        Some(path) if path.exists() => {
            info!("Loading config from {}", path.display());
            load_toml_config(&path).map(Some)
        }
        Some(path) => {
            warn!("No config file at {}, using defaults", path.display());
            Ok(None)
        }
        None => {
            warn!("Could not determine config directory, using defaults");
            Ok(None)
        }
    }
}

/// `<config_dir>/smd/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("smd").join("config.toml"))
}

/// `<data_local_dir>/smd/smd.db`, or `./smd_data/smd.db` if the platform has none
pub fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("smd"))
        .unwrap_or_else(|| PathBuf::from("./smd_data"))
        .join("smd.db")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::FlowDepth;

    #[test]
    fn test_defaults_without_file_or_overrides() {
        let config = ServiceConfig::resolve(&Overrides::default(), None).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.bind, DEFAULT_BIND);
        assert_eq!(config.database, default_database_path());
        assert_eq!(config.flow, FlowOptions::default());
    }

    #[test]
    fn test_override_beats_file() {
        let file: TomlConfig = toml::from_str(
            r#"
            port = 6000
            bind = "0.0.0.0"

            [flow]
            topic_limit = 8
            depth = "category"
            "#,
        )
        .unwrap();
        let overrides = Overrides {
            port: Some(7000),
            topic_limit: Some(4),
            ..Default::default()
        };

        let config = ServiceConfig::resolve(&overrides, Some(file)).unwrap();
        assert_eq!(config.port, 7000);
        assert_eq!(config.bind, "0.0.0.0");
        assert_eq!(config.flow.topic_limit, 4);
        assert_eq!(config.flow.depth, FlowDepth::CategoryAdjective);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(toml::from_str::<TomlConfig>("prot = 1").is_err());
    }

    #[test]
    fn test_empty_root_label_rejected() {
        let file: TomlConfig = toml::from_str("[flow]\nroot_label = \"  \"").unwrap();
        let result = ServiceConfig::resolve(&Overrides::default(), Some(file));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_socket_addr() {
        let config = ServiceConfig::resolve(&Overrides::default(), None).unwrap();
        assert_eq!(config.socket_addr().unwrap().port(), DEFAULT_PORT);

        let bad = ServiceConfig {
            bind: "not an ip".to_string(),
            ..config
        };
        assert!(bad.socket_addr().is_err());
    }

    #[test]
    fn test_default_database_path_file_name() {
        assert_eq!(default_database_path().file_name().unwrap(), "smd.db");
    }
}
