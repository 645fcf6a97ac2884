//! Command-line arguments
//!
//! Every flag falls back to an `SMD_*` environment variable, then to the
//! config file, then to the compiled default.

use std::path::PathBuf;

use clap::Parser;
use smd_common::config::Overrides;

#[derive(Debug, Parser)]
#[command(name = "smd-charts", version, about = "Sentiment Metric Dashboard chart-data service")]
pub struct Args {
    /// Port to listen on
    #[arg(long, env = "SMD_PORT")]
    pub port: Option<u16>,

    /// Address to bind
    #[arg(long, env = "SMD_BIND")]
    pub bind: Option<String>,

    /// Path of the SQLite event store
    #[arg(long, env = "SMD_DATABASE")]
    pub database: Option<PathBuf>,

    /// Path of the TOML config file
    #[arg(long, env = "SMD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Number of topics kept in the flow diagram
    #[arg(long, env = "SMD_TOPIC_LIMIT")]
    pub topic_limit: Option<usize>,
}

impl Args {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            database: self.database.clone(),
            bind: self.bind.clone(),
            port: self.port,
            topic_limit: self.topic_limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 5] = ["SMD_PORT", "SMD_BIND", "SMD_DATABASE", "SMD_CONFIG", "SMD_TOPIC_LIMIT"];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_no_flags_no_overrides() {
        clear_env();
        let args = Args::try_parse_from(["smd-charts"]).unwrap();
        let overrides = args.overrides();
        assert!(overrides.port.is_none());
        assert!(overrides.database.is_none());
        assert!(args.config.is_none());
    }

    #[test]
    #[serial]
    fn test_env_fallback() {
        clear_env();
        std::env::set_var("SMD_PORT", "6123");
        std::env::set_var("SMD_DATABASE", "/tmp/smd-test.db");

        let args = Args::try_parse_from(["smd-charts"]).unwrap();
        assert_eq!(args.port, Some(6123));
        assert_eq!(args.database, Some(PathBuf::from("/tmp/smd-test.db")));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_flag_beats_env() {
        clear_env();
        std::env::set_var("SMD_PORT", "6123");

        let args = Args::try_parse_from(["smd-charts", "--port", "7001", "--topic-limit", "5"]).unwrap();
        assert_eq!(args.port, Some(7001));
        assert_eq!(args.overrides().topic_limit, Some(5));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_port_rejected() {
        clear_env();
        assert!(Args::try_parse_from(["smd-charts", "--port", "99999"]).is_err());
    }
}
