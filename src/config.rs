//! Runtime configuration assembled from global command-line flags.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::cli::Cli;
use crate::sync::{Backend, HttpBackend, MemoryBackend, SyncClient};

pub const DEFAULT_SERVER: &str = "http://127.0.0.1:3000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Where the board syncs to and where it logs.
#[derive(Debug, Clone)]
pub struct Config {
    pub server: String,
    pub timeout: Duration,
    pub offline: bool,
    pub log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: DEFAULT_SERVER.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            offline: false,
            log_file: default_log_file(),
        }
    }
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Self {
        Config {
            server: cli.server.clone(),
            timeout: Duration::from_secs(cli.timeout.max(1)),
            offline: cli.offline,
            log_file: cli.log_file.clone().unwrap_or_else(default_log_file),
        }
    }

    /// Backend selected by the flags.
    pub fn backend(&self) -> Arc<dyn Backend> {
        if self.offline {
            Arc::new(MemoryBackend::new())
        } else {
            Arc::new(HttpBackend::new(&self.server, self.timeout))
        }
    }

    /// Sync client whose saves run on the caller (one-shot commands).
    pub fn inline_sync(&self) -> SyncClient {
        SyncClient::inline(self.backend())
    }

    /// Sync client whose saves never block the caller (interactive board).
    pub fn background_sync(&self) -> SyncClient {
        SyncClient::background(self.backend())
    }
}

/// Log file in the system temp dir, so terminal output stays clean.
pub fn default_log_file() -> PathBuf {
    std::env::temp_dir().join("weekboard.log")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::parse_from([
            "wb",
            "--server",
            "http://example.test:8080/",
            "--timeout",
            "0",
            "--log-file",
            "/tmp/wb-test.log",
            "key",
        ]);
        let config = Config::from_cli(&cli);
        assert_eq!(config.server, "http://example.test:8080/");
        assert_eq!(config.timeout, Duration::from_secs(1));
        assert_eq!(config.log_file, PathBuf::from("/tmp/wb-test.log"));
        assert!(!config.offline);
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["wb", "--offline", "show"]);
        let config = Config::from_cli(&cli);
        assert_eq!(config.server, DEFAULT_SERVER);
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert!(config.offline);
        assert_eq!(config.log_file, default_log_file());
    }
}
