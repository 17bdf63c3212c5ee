//! Outgoing cookie collection
//!
//! Cookies are staged while a controller runs and emitted as `Set-Cookie`
//! headers when the response is finalized.

use chrono::{DateTime, Utc};
use hyper::header::{HeaderMap, HeaderValue, InvalidHeaderValue, SET_COOKIE};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

const EXPIRES_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";
const DELETED_EXPIRES: &str = "Thu, 01 Jan 1970 00:00:01 GMT";

/// A single cookie
///
/// Defaults: no value, `expire` 0 (session cookie), no path or domain,
/// not secure, HTTP-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cookie {
    pub value: Option<String>,
    /// Unix timestamp; 0 means the cookie lives for the browser session
    pub expire: i64,
    pub path: Option<String>,
    pub domain: Option<String>,
    pub secure: bool,
    pub httponly: bool,
}

impl Default for Cookie {
    fn default() -> Self {
        Self {
            value: None,
            expire: 0,
            path: None,
            domain: None,
            secure: false,
            httponly: true,
        }
    }
}

impl Cookie {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    #[must_use]
    pub const fn with_expire(mut self, expire: i64) -> Self {
        self.expire = expire;
        self
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    #[must_use]
    pub const fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    #[must_use]
    pub const fn with_httponly(mut self, httponly: bool) -> Self {
        self.httponly = httponly;
        self
    }

    /// Render the `Set-Cookie` header value for this cookie
    ///
    /// A missing or empty value produces a deletion cookie that expired at the epoch.
    pub fn to_header_string(&self, name: &str, now: DateTime<Utc>) -> String {
        let mut header = match self.value.as_deref() {
            None | Some("") => format!("{name}=deleted; expires={DELETED_EXPIRES}; Max-Age=0"),
            Some(value) => {
                let mut header = format!("{name}={value}");
                if self.expire > 0 {
                    if let Some(expires) = DateTime::from_timestamp(self.expire, 0) {
                        let max_age = (self.expire - now.timestamp()).max(0);
                        header.push_str(&format!(
                            "; expires={}; Max-Age={max_age}",
                            expires.format(EXPIRES_FORMAT)
                        ));
                    }
                }
                header
            }
        };

        if let Some(path) = &self.path {
            header.push_str(&format!("; path={path}"));
        }
        if let Some(domain) = &self.domain {
            header.push_str(&format!("; domain={domain}"));
        }
        if self.secure {
            header.push_str("; secure");
        }
        if self.httponly {
            header.push_str("; HttpOnly");
        }
        header
    }
}

/// Cookies to send with the current response, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cookies {
    list: Vec<(String, Cookie)>,
}

impl Cookies {
    pub const fn new() -> Self {
        Self { list: Vec::new() }
    }

    /// Set a cookie by name
    ///
    /// Replacing an existing cookie keeps its original position.
    pub fn set(&mut self, name: impl Into<String>, cookie: Cookie) {
        let name = name.into();
        match self.list.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = cookie,
            None => self.list.push((name, cookie)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Cookie> {
        self.list
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, cookie)| cookie)
    }

    pub fn get_all(&self) -> &[(String, Cookie)] {
        &self.list
    }

    /// Replace every cookie at once
    pub fn set_all<I, N>(&mut self, cookies: I)
    where
        I: IntoIterator<Item = (N, Cookie)>,
        N: Into<String>,
    {
        self.list.clear();
        for (name, cookie) in cookies {
            self.set(name, cookie);
        }
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Append one `Set-Cookie` header per cookie, in insertion order
    pub fn send(&self, headers: &mut HeaderMap) -> Result<(), InvalidHeaderValue> {
        self.send_at(headers, Utc::now())
    }

    fn send_at(&self, headers: &mut HeaderMap, now: DateTime<Utc>) -> Result<(), InvalidHeaderValue> {
        for (name, cookie) in &self.list {
            let value = HeaderValue::from_str(&cookie.to_header_string(name, now))?;
            headers.append(SET_COOKIE, value);
        }
        Ok(())
    }
}

impl Serialize for Cookies {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.list.len()))?;
        for (name, cookie) in &self.list {
            map.serialize_entry(name, cookie)?;
        }
        map.end()
    }
}
