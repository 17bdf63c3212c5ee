//! Application controllers
//!
//! The request context, page type and controller trait the demo server
//! dispatches to, plus the registry and container wiring for the built-in
//! controllers.

mod builtin;

use std::net::SocketAddr;
use std::sync::Arc;

use hyper::{Method, StatusCode};

use crate::config::ControllersConfig;
use crate::http::cookies::{Cookie, Cookies};
use crate::sql::Profiler;
use crate::web::binding::qualify;
use crate::web::{normalize, ClassRef, Container, ControllerFactory, HandlerRegistry};

pub use builtin::{Hello, Index, NotFound, Profiles};

/// Container holding the built-in controller constructors
pub type AppContainer = Container<WebContext, Box<dyn Controller>>;

/// Factory type used by the server
pub type AppFactory = ControllerFactory<HandlerRegistry, AppContainer>;

/// Per-request state shared with the controller
#[derive(Debug)]
pub struct WebContext {
    pub method: Method,
    pub is_head: bool,
    pub path: String,
    pub query: Option<String>,
    pub peer: Option<SocketAddr>,
    /// Cookie attributes configured for this site
    pub cookie_base: Cookie,
    pub profiler: Arc<Profiler>,
}

/// Rendered controller output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub status: StatusCode,
    pub content_type: &'static str,
    pub body: String,
    pub cookies: Cookies,
}

impl Page {
    pub fn html(body: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            content_type: "text/html; charset=utf-8",
            body: body.into(),
            cookies: Cookies::new(),
        }
    }

    pub fn json(value: &serde_json::Value) -> Self {
        Self {
            status: StatusCode::OK,
            content_type: "application/json",
            body: value.to_string(),
            cookies: Cookies::new(),
        }
    }

    #[must_use]
    pub const fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }
}

/// A request-serving unit built by the factory
pub trait Controller: Send {
    fn exec(&mut self) -> Page;
}

/// Names of the built-in controllers, as bound in the registry
pub const BUILTIN_CONTROLLERS: [&str; 3] = ["index", "hello", "profiles"];

/// Class name of the built-in not-found controller
pub fn not_found_class(namespace: &str) -> ClassRef {
    if namespace.is_empty() {
        ClassRef::from("NotFound")
    } else {
        ClassRef::new(format!("{namespace}::NotFound"))
    }
}

/// Registry binding every built-in controller under `namespace`
pub fn build_registry(namespace: &str) -> HandlerRegistry {
    BUILTIN_CONTROLLERS
        .into_iter()
        .fold(HandlerRegistry::builder(namespace), |registry, name| registry.bind(name))
        .build()
}

/// Container able to construct every built-in controller under `namespace`
pub fn build_container(namespace: &str) -> AppContainer {
    Container::new()
        .register(qualify(namespace, &normalize("index")), Index::construct)
        .register(qualify(namespace, &normalize("hello")), Hello::construct)
        .register(qualify(namespace, &normalize("profiles")), Profiles::construct)
        .register(not_found_class(namespace), NotFound::construct)
}

/// Build the registry, container and factory for the built-in controllers
pub fn build_factory(cfg: &ControllersConfig) -> AppFactory {
    let ns = cfg.namespace.as_str();
    ControllerFactory::new(build_registry(ns), cfg.fallback_policy(), build_container(ns))
}
