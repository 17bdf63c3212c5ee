//! Bull web dispatching helpers
//!
//! - [`web`]: controller name normalization, bindings, fallback and the
//!   [`ControllerFactory`](web::ControllerFactory)
//! - [`http`]: outgoing cookies and response building
//! - [`sql`]: statement and callable profiling
//! - [`controller`], [`server`]: a small hyper server wired to the factory

pub mod config;
pub mod controller;
pub mod http;
pub mod logger;
pub mod server;
pub mod sql;
pub mod web;
