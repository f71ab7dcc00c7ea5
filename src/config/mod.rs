// Configuration module entry point
// Layers built-in defaults, an optional config file and environment overrides

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::Config;

/// Config file looked up when no path is given on the command line
pub const DEFAULT_CONFIG_PATH: &str = "todo-backend";

impl Config {
    /// Load configuration from the default file name
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from specified file path (without extension)
    ///
    /// The file is optional; with no file and no `TODO_*` variables the
    /// defaults below apply unchanged.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        Self::builder()?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("TODO")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
        config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "todo-backend")?
            .set_default("http.max_body_size", 1_048_576) // 1MB
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
impl Config {
    /// Defaults only, without touching the filesystem or environment
    pub fn defaults() -> Self {
        Self::builder()
            .and_then(|builder| builder.build())
            .and_then(|settings| settings.try_deserialize())
            .expect("built-in defaults must deserialize")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_listen_on_8080() {
        let cfg = Config::defaults();
        assert_eq!(cfg.get_socket_addr().unwrap(), "0.0.0.0:8080".parse().unwrap());
        assert_eq!(cfg.server.workers, None);
        assert_eq!(cfg.performance.max_connections, None);
        assert!(cfg.logging.access_log);
        assert_eq!(cfg.logging.access_log_format, "combined");
        assert_eq!(cfg.http.max_body_size, 1_048_576);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = std::env::temp_dir().join(format!("todo-backend-cfg-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("override.toml");
        std::fs::write(
            &path,
            "[server]\nport = 9090\nworkers = 2\n\n[logging]\naccess_log = false\n",
        )
        .unwrap();

        let base = path.with_extension("");
        let cfg = Config::load_from(base.to_str().unwrap()).unwrap();
        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.server.workers, Some(2));
        assert!(!cfg.logging.access_log);
        // Untouched keys keep their defaults
        assert_eq!(cfg.server.host, "0.0.0.0");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_environment_overrides_defaults() {
        // Only this test reads the server name, so the variable cannot leak into others
        std::env::set_var("TODO_HTTP__SERVER_NAME", "todo-from-env");
        let cfg = Config::load_from("todo-backend-env-test-missing");
        std::env::remove_var("TODO_HTTP__SERVER_NAME");

        let cfg = cfg.unwrap();
        assert_eq!(cfg.http.server_name, "todo-from-env");
        assert_eq!(cfg.server.port, 8080);
    }

    #[test]
    fn test_invalid_host_is_rejected() {
        let mut cfg = Config::defaults();
        cfg.server.host = "not a host".to_string();
        assert!(cfg.get_socket_addr().is_err());
    }

    #[test]
    fn test_connection_timeout_uses_larger_value() {
        let mut cfg = Config::defaults();
        cfg.performance.read_timeout = 5;
        cfg.performance.write_timeout = 12;
        assert_eq!(cfg.performance.connection_timeout().as_secs(), 12);
    }
}
