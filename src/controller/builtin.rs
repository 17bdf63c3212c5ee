//! Built-in controllers

use chrono::Utc;
use hyper::StatusCode;
use serde_json::json;
use std::sync::Arc;

use super::{Controller, Page, WebContext};
use crate::web::{BoxError, ConstructionArgs, Params};

/// Landing page
pub struct Index {
    context: Arc<WebContext>,
}

impl Index {
    pub fn construct(args: ConstructionArgs<WebContext>) -> Result<Box<dyn Controller>, BoxError> {
        Ok(Box::new(Self {
            context: args.context,
        }))
    }
}

impl Controller for Index {
    fn exec(&mut self) -> Page {
        Page::html(format!(
            "<!DOCTYPE html>\n<html><head><title>Bull</title></head><body>\
             <h1>It works</h1><p>Served {} {}</p></body></html>\n",
            self.context.method, self.context.path
        ))
    }
}

/// Greets `name` and remembers the visit in a cookie
pub struct Hello {
    context: Arc<WebContext>,
    params: Arc<Params>,
}

impl Hello {
    pub fn construct(args: ConstructionArgs<WebContext>) -> Result<Box<dyn Controller>, BoxError> {
        Ok(Box::new(Self {
            context: args.context,
            params: args.params,
        }))
    }

    fn name(&self) -> String {
        match self.params.get("name") {
            Some(serde_json::Value::String(name)) if !name.is_empty() => name.clone(),
            Some(serde_json::Value::String(_)) | None => "world".to_string(),
            Some(other) => other.to_string(),
        }
    }
}

impl Controller for Hello {
    fn exec(&mut self) -> Page {
        let mut page = Page::json(&json!({
            "greeting": format!("Hello, {}!", self.name()),
            "params": self.params.as_ref(),
        }));
        let visit = self
            .context
            .cookie_base
            .clone()
            .with_value(Utc::now().timestamp().to_string());
        page.cookies.set("last_visit", visit);
        page
    }
}

/// Lists the profiles recorded so far
pub struct Profiles {
    context: Arc<WebContext>,
}

impl Profiles {
    pub fn construct(args: ConstructionArgs<WebContext>) -> Result<Box<dyn Controller>, BoxError> {
        Ok(Box::new(Self {
            context: args.context,
        }))
    }
}

impl Controller for Profiles {
    fn exec(&mut self) -> Page {
        let profiler = &self.context.profiler;
        Page::json(&json!({
            "active": profiler.is_active(),
            "profiles": profiler.get_profiles(),
        }))
    }
}

/// Fallback for names without a binding
pub struct NotFound {
    context: Arc<WebContext>,
}

impl NotFound {
    pub fn construct(args: ConstructionArgs<WebContext>) -> Result<Box<dyn Controller>, BoxError> {
        Ok(Box::new(Self {
            context: args.context,
        }))
    }
}

impl Controller for NotFound {
    fn exec(&mut self) -> Page {
        Page::html(format!(
            "<!DOCTYPE html>\n<html><head><title>Not Found</title></head><body>\
             <h1>404 Not Found</h1><p>No controller for {}</p></body></html>\n",
            self.context.path
        ))
        .with_status(StatusCode::NOT_FOUND)
    }
}
