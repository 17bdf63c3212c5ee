// Configuration module entry point
// Loads application configuration and holds the shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{
    Config, ControllersConfig, CookieConfig, LoggingConfig, PerformanceConfig, ProfilerConfig,
    ServerConfig,
};

/// Config file looked up when no path is given (extension optional)
pub const DEFAULT_CONFIG_PATH: &str = "bull";

impl Config {
    /// Load configuration from specified file path (without extension)
    ///
    /// The file is optional; `BULL_*` environment variables override it,
    /// with `__` separating nested keys (`BULL_SERVER__PORT=9000`).
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        Self::load_with_env(config_path, None)
    }

    /// Like [`load_from`](Self::load_from), reading `BULL_*` overrides from
    /// `env` instead of the process environment when given
    pub fn load_with_env(
        config_path: &str,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("BULL")
                    .prefix_separator("_")
                    .separator("__")
                    .source(env),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.backlog", 128)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("controllers.namespace", crate::web::DEFAULT_NAMESPACE)?
            .set_default("controllers.default_name", "index")?
            .set_default("profiler.active", false)?
            .set_default("profiler.capture_trace", false)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}
