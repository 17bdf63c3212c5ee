// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

use crate::http::cookies::Cookie;
use crate::web::{FallbackPolicy, DEFAULT_NAMESPACE};

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    #[serde(default)]
    pub controllers: ControllersConfig,
    #[serde(default)]
    pub profiler: ProfilerConfig,
    #[serde(default)]
    pub cookies: CookieConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
    /// Pending connection queue length passed to `listen`
    #[serde(default = "default_backlog")]
    pub backlog: i32,
}

const fn default_backlog() -> i32 {
    128
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

/// Controller resolution settings
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ControllersConfig {
    /// Namespace registry bindings are qualified with
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// Controller name used for the bare `/` path
    #[serde(default = "default_controller_name")]
    pub default_name: String,
    /// Class instantiated when no binding matches (none: 404)
    #[serde(default)]
    pub not_found: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_controller_name() -> String {
    "index".to_string()
}

impl Default for ControllersConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            default_name: default_controller_name(),
            not_found: None,
        }
    }
}

impl ControllersConfig {
    pub fn fallback_policy(&self) -> FallbackPolicy {
        FallbackPolicy::from(self.not_found.clone())
    }
}

/// Profiler settings
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProfilerConfig {
    #[serde(default)]
    pub active: bool,
    /// Capture a stack trace per profile (costly)
    #[serde(default)]
    pub capture_trace: bool,
}

/// Base attributes for cookies set by controllers
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct CookieConfig {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub secure: bool,
    #[serde(default = "default_httponly")]
    pub httponly: bool,
}

#[allow(clippy::missing_const_for_fn)]
fn default_httponly() -> bool {
    true
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            path: None,
            domain: None,
            secure: false,
            httponly: default_httponly(),
        }
    }
}

impl CookieConfig {
    /// Cookie carrying the configured attributes and no value
    pub fn base_cookie(&self) -> Cookie {
        Cookie {
            path: self.path.clone(),
            domain: self.domain.clone(),
            secure: self.secure,
            httponly: self.httponly,
            ..Cookie::default()
        }
    }
}
