//! Configuration module
//!
//! Loads server settings from an optional `config.toml`, `SERVER_*`
//! environment variables, and built-in defaults. The defaults reproduce the
//! fixed surface of the dashboard server: `127.0.0.1:5000`, project root in
//! the current directory, browser auto-open after 1.5 seconds.

use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub site: SiteConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub browser: BrowserConfig,
}

/// Listen address configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Location of the dashboard asset tree
#[derive(Debug, Deserialize, Clone)]
pub struct SiteConfig {
    /// Project root containing the `pages/`, `js/` and `data/` directories.
    pub root: PathBuf,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Whether to emit one access-log line per request
    pub access_log: bool,
    /// Access log format: `common`, `combined` or `json`
    pub access_log_format: String,
    /// Access log file path; stdout when unset
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path; stderr when unset
    #[serde(default)]
    pub error_log_file: Option<String>,
}

/// Connection handling tunables
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    /// Keep-alive timeout in seconds; 0 disables keep-alive
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
}

/// Browser auto-open configuration
#[derive(Debug, Deserialize, Clone)]
pub struct BrowserConfig {
    pub auto_open: bool,
    /// Delay before opening, giving the listener time to come up
    pub open_delay_ms: u64,
}

impl Config {
    /// Load configuration from the default `config.toml` location.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from specified file path (without extension)
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("SERVER"))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5000)?
            .set_default("site.root", ".")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "common")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("browser.auto_open", true)?
            .set_default("browser.open_delay_ms", 1500)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    /// Base URL shown to the operator and opened in the browser.
    pub fn base_url(&self) -> String {
        let host = if self.server.host == "127.0.0.1" {
            "localhost"
        } else {
            &self.server.host
        };
        format!("http://{}:{}", host, self.server.port)
    }
}

/// Read-only state shared across request handlers.
pub struct AppState {
    pub config: Config,
}

impl AppState {
    pub const fn new(config: Config) -> Self {
        Self { config }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_reproduce_fixed_surface() {
        let cfg = Config::load_from("no-such-config").unwrap();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 5000);
        assert_eq!(cfg.site.root, PathBuf::from("."));
        assert!(cfg.browser.auto_open);
        assert_eq!(cfg.browser.open_delay_ms, 1500);
        assert!(cfg.logging.access_log);
        assert_eq!(cfg.logging.access_log_format, "common");
        assert!(cfg.logging.access_log_file.is_none());
    }

    #[test]
    fn test_socket_addr() {
        let cfg = Config::load_from("no-such-config").unwrap();
        let addr = cfg.socket_addr().unwrap();
        assert_eq!(addr, "127.0.0.1:5000".parse().unwrap());
    }

    #[test]
    fn test_base_url_shows_localhost_for_loopback() {
        let mut cfg = Config::load_from("no-such-config").unwrap();
        assert_eq!(cfg.base_url(), "http://localhost:5000");

        cfg.server.host = "0.0.0.0".to_string();
        assert_eq!(cfg.base_url(), "http://0.0.0.0:5000");
    }
}
