//! Controller name normalization
//!
//! Turns the raw symbolic name handed to the factory into the identifier
//! bindings are keyed by.

use std::fmt;

/// Canonical handler identifier, e.g. `Blog` for the raw name `bLOG`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerIdentifier(String);

impl HandlerIdentifier {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for HandlerIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for HandlerIdentifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Normalize a raw controller name
///
/// Lower-cases the whole input, then upper-cases the first character only.
/// Empty or symbol-only input passes through without error. Multi-segment
/// names (`blog::post`, `blog/post`) are not split; they are transformed
/// character by character like any other string. A first character whose
/// upper-case form spans several characters is left lower-case.
pub fn normalize(raw: &str) -> HandlerIdentifier {
    let lowered = raw.to_lowercase();
    let mut chars = lowered.chars();
    let identifier = match chars.next() {
        Some(first) => {
            // Multi-char expansions (e.g. 'ß' -> "SS") would break idempotence
            let mut upper = first.to_uppercase();
            let head = match (upper.next(), upper.next()) {
                (Some(single), None) => single,
                _ => first,
            };
            std::iter::once(head).chain(chars).collect()
        }
        None => String::new(),
    };
    HandlerIdentifier(identifier)
}
