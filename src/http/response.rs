//! HTTP response building module
//!
//! Turns controller pages and dispatch failures into hyper responses.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

use crate::controller::Page;

/// Build 404 Not Found response
pub fn build_404_response() -> Response<Full<Bytes>> {
    build_plain_response(StatusCode::NOT_FOUND, "404 Not Found")
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::METHOD_NOT_ALLOWED)
        .header("Content-Type", "text/plain")
        .header("Allow", "GET, HEAD")
        .body(Full::new(Bytes::from("405 Method Not Allowed")))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            Response::new(Full::new(Bytes::from("405 Method Not Allowed")))
        })
}

/// Build 500 Internal Server Error response
pub fn build_500_response() -> Response<Full<Bytes>> {
    build_plain_response(StatusCode::INTERNAL_SERVER_ERROR, "500 Internal Server Error")
}

fn build_plain_response(status: StatusCode, text: &'static str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from(text)))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(Bytes::from(text)))
        })
}

/// Build the response for a rendered page, including its cookies
///
/// A cookie that cannot be encoded as a header turns the whole response into a 500.
pub fn build_page_response(page: Page, is_head: bool) -> Response<Full<Bytes>> {
    let content_length = page.body.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(page.body)
    };

    let mut response = match Response::builder()
        .status(page.status)
        .header("Content-Type", page.content_type)
        .header("Content-Length", content_length)
        .body(Full::new(body))
    {
        Ok(response) => response,
        Err(e) => {
            log_build_error(page.status.as_str(), &e);
            return build_500_response();
        }
    };

    if let Err(e) = page.cookies.send(response.headers_mut()) {
        crate::logger::log_error(&format!("Invalid cookie header: {e}"));
        return build_500_response();
    }
    response
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::cookies::Cookie;
    use hyper::header::SET_COOKIE;

    #[test]
    fn test_page_response_carries_cookies() {
        let mut page = Page::html("<p>hi</p>");
        page.cookies.set("a", Cookie::new("1"));
        page.cookies.set("b", Cookie::new("2").with_path("/"));

        let response = build_page_response(page, false);
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["Content-Length"], "9");
        let cookies: Vec<_> = response.headers().get_all(SET_COOKIE).iter().collect();
        assert_eq!(cookies.len(), 2);
        assert_eq!(cookies[0], "a=1; HttpOnly");
        assert_eq!(cookies[1], "b=2; path=/; HttpOnly");
    }

    #[test]
    fn test_head_page_keeps_length() {
        let page = Page::html("hello").with_status(StatusCode::NOT_FOUND);
        let response = build_page_response(page, true);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()["Content-Length"], "5");
    }

    #[test]
    fn test_bad_cookie_becomes_500() {
        let mut page = Page::html("x");
        page.cookies.set("bad", Cookie::new("a\r\nb"));
        assert_eq!(
            build_page_response(page, false).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_responses() {
        assert_eq!(build_404_response().status(), StatusCode::NOT_FOUND);
        assert_eq!(build_405_response().headers()["Allow"], "GET, HEAD");
        assert_eq!(build_500_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
