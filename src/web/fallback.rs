//! Fallback handler policy

use super::binding::ClassRef;

/// Handler used when no binding matches the requested identifier
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FallbackPolicy {
    not_found: Option<ClassRef>,
}

impl FallbackPolicy {
    pub const fn new(not_found: Option<ClassRef>) -> Self {
        Self { not_found }
    }

    /// Policy without a substitute; unknown names fail resolution
    pub const fn none() -> Self {
        Self { not_found: None }
    }

    pub fn fallback(&self) -> Option<&ClassRef> {
        self.not_found.as_ref()
    }
}

impl From<Option<String>> for FallbackPolicy {
    fn from(not_found: Option<String>) -> Self {
        Self::new(not_found.map(ClassRef::from))
    }
}
