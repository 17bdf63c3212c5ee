//! HTTP protocol layer module
//!
//! Response building and outgoing cookies, independent of controller logic.

pub mod cookies;
pub mod response;

// Re-export commonly used types
pub use cookies::{Cookie, Cookies};
pub use response::{build_404_response, build_405_response, build_500_response, build_page_response};
