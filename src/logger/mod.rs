//! Logger module
//!
//! Logging helpers for the server and the controller factory:
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Controller resolution and profiling traces
//! - File-based logging support

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::Config;
use crate::web::ClassRef;
use std::net::SocketAddr;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

/// Write to info/access log
fn write_info(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => println!("{message}"),
    }
}

/// Write to error log
fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    write_info("======================================");
    write_info("Bull web dispatcher started");
    write_info(&format!("Listening on: http://{addr}"));
    write_info(&format!("Log level: {}", config.logging.level));
    if let Some(workers) = config.server.workers {
        write_info(&format!("Worker threads: {workers}"));
    }
    write_info(&format!("Controller namespace: {}", config.controllers.namespace));
    match &config.controllers.not_found {
        Some(class) => write_info(&format!("Not-found controller: {class}")),
        None => write_info("Not-found controller: none (404)"),
    }
    write_info(&format!(
        "Profiler: {}",
        if config.profiler.active { "active" } else { "inactive" }
    ));
    if let Some(ref path) = config.logging.access_log_file {
        write_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
    write_info("======================================\n");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    write_info(&format!("[Connection] Accepted from: {peer_addr}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_info(&entry.format(format));
}

pub fn log_controller_resolved(name: &str, class: &ClassRef) {
    write_info(&format!("[Controller] '{name}' -> {class}"));
}

pub fn log_fallback_used(name: &str, class: &ClassRef) {
    write_info(&format!("[Controller] '{name}' has no binding, using {class}"));
}

pub fn log_no_binding(name: &str) {
    log_warning(&format!("[Controller] No class for controller '{name}'"));
}

pub fn log_instantiation_failed(name: &str, err: &impl std::fmt::Display) {
    log_error(&format!("[Controller] Failed to build '{name}': {err}"));
}
