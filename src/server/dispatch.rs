//! Request dispatch module
//!
//! Maps an incoming request to a controller name and parameters, resolves the
//! controller through the factory and renders its page.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::USER_AGENT;
use hyper::{Method, Request, Response};
use serde_json::json;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;

use crate::config::AppState;
use crate::controller::{AppContainer, WebContext};
use crate::http;
use crate::logger::{self, AccessLogEntry};
use crate::sql::Profiler;
use crate::web::{BindingResolver, ClassRef, ControllerFactory, Params, ResolveError};

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let query = req.uri().query().map(ToString::to_string);

    let mut entry = AccessLogEntry::new(peer.ip().to_string(), method.to_string(), path.clone());
    entry.query.clone_from(&query);
    entry.user_agent = req
        .headers()
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string);

    let response = if matches!(method, Method::GET | Method::HEAD) {
        let name = controller_name(&path, &state.config.controllers.default_name).to_string();
        let params = parse_params(query.as_deref());

        let context = Arc::new(WebContext {
            is_head: method == Method::HEAD,
            method,
            path,
            query,
            peer: Some(peer),
            cookie_base: state.config.cookies.base_cookie(),
            profiler: Arc::clone(&state.profiler),
        });
        let (response, class) = dispatch(&state.factory, &state.profiler, context, &name, params);
        entry.controller = class.map(|class| class.to_string());
        response
    } else {
        logger::log_warning(&format!("Method not allowed: {method}"));
        http::build_405_response()
    };

    if state.cached_access_log.load(Ordering::Relaxed) {
        entry.status = response.status().as_u16();
        entry.body_bytes = response
            .headers()
            .get("Content-Length")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Resolve, run and render the controller for `name`
///
/// Also returns the class that served the request, when one was found.
fn dispatch<R: BindingResolver>(
    factory: &ControllerFactory<R, AppContainer>,
    profiler: &Profiler,
    context: Arc<WebContext>,
    name: &str,
    params: Params,
) -> (Response<Full<Bytes>>, Option<ClassRef>) {
    let is_head = context.is_head;
    match factory.resolve_located(context, name, Arc::new(params)) {
        Ok((located, mut controller)) => {
            let page = profiler.call(
                || controller.exec(),
                &format!("controller:{name}"),
                json!({ "name": name }),
            );
            let class = located.class().clone();
            (http::build_page_response(page, is_head), Some(class))
        }
        Err(ResolveError::NoBinding(e)) => {
            logger::log_no_binding(&e.name);
            (http::build_404_response(), None)
        }
        Err(ResolveError::MissingClass(e)) => {
            logger::log_error(&format!("[Controller] '{name}': {e}"));
            (http::build_500_response(), None)
        }
        Err(ResolveError::Instantiation(e)) => {
            logger::log_instantiation_failed(name, &e);
            (http::build_500_response(), None)
        }
    }
}

/// Controller name for a request path: its first non-empty segment
fn controller_name<'a>(path: &'a str, default_name: &'a str) -> &'a str {
    path.split('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or(default_name)
}

/// Split a query string into parameters
///
/// Values are kept as raw strings without percent-decoding. A key without
/// `=` maps to an empty string; repeated keys keep the last value.
fn parse_params(query: Option<&str>) -> Params {
    let mut params = Params::new();
    let Some(query) = query else {
        return params;
    };
    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        params.insert(key.to_string(), json!(value));
    }
    params
}
