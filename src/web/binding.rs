//! Handler bindings
//!
//! Maps normalized identifiers to the class references the container knows
//! how to build. The registry is assembled once at startup and never changes.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::name::{normalize, HandlerIdentifier};

/// Namespace bindings are qualified with when none is configured
pub const DEFAULT_NAMESPACE: &str = "Framework::Web";

/// Fully-qualified reference to a constructible handler type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassRef(Arc<str>);

impl ClassRef {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClassRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ClassRef {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ClassRef {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

/// Existence check for handler implementations
///
/// Implementations only report availability; they never build anything.
pub trait BindingResolver {
    fn exists(&self, identifier: &HandlerIdentifier) -> bool;

    /// Class reference for an identifier, `None` when no binding exists
    fn class_of(&self, identifier: &HandlerIdentifier) -> Option<ClassRef>;
}

/// Immutable identifier -> class table
#[derive(Debug, Clone, Default)]
pub struct HandlerRegistry {
    bindings: HashMap<HandlerIdentifier, ClassRef>,
}

impl HandlerRegistry {
    /// Start a registry whose bindings are qualified with `namespace`
    pub fn builder(namespace: impl Into<String>) -> HandlerRegistryBuilder {
        HandlerRegistryBuilder {
            namespace: namespace.into(),
            bindings: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl BindingResolver for HandlerRegistry {
    fn exists(&self, identifier: &HandlerIdentifier) -> bool {
        self.bindings.contains_key(identifier)
    }

    fn class_of(&self, identifier: &HandlerIdentifier) -> Option<ClassRef> {
        self.bindings.get(identifier).cloned()
    }
}

/// Builder for [`HandlerRegistry`]
#[derive(Debug)]
pub struct HandlerRegistryBuilder {
    namespace: String,
    bindings: HashMap<HandlerIdentifier, ClassRef>,
}

impl HandlerRegistryBuilder {
    /// Bind a controller name to `<namespace>::<Identifier>`
    ///
    /// The name goes through the same normalization as lookups, so `bind("blog")`
    /// and `bind("BLOG")` register the same binding.
    #[must_use]
    pub fn bind(mut self, name: &str) -> Self {
        let identifier = normalize(name);
        let class = qualify(&self.namespace, &identifier);
        self.bindings.insert(identifier, class);
        self
    }

    /// Bind a controller name to an explicit class reference
    #[must_use]
    pub fn bind_class(mut self, name: &str, class: impl Into<ClassRef>) -> Self {
        self.bindings.insert(normalize(name), class.into());
        self
    }

    pub fn build(self) -> HandlerRegistry {
        HandlerRegistry {
            bindings: self.bindings,
        }
    }
}

/// Qualify an identifier with a namespace, e.g. `Framework::Web::Blog`
pub fn qualify(namespace: &str, identifier: &HandlerIdentifier) -> ClassRef {
    if namespace.is_empty() {
        ClassRef::new(identifier.as_str())
    } else {
        ClassRef::new(format!("{namespace}::{identifier}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_lookup() {
        let registry = HandlerRegistry::builder(DEFAULT_NAMESPACE)
            .bind("blog")
            .bind("Index")
            .build();

        let blog = normalize("BLOG");
        assert!(registry.exists(&blog));
        assert_eq!(
            registry.class_of(&blog),
            Some(ClassRef::from("Framework::Web::Blog"))
        );
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_registry_missing() {
        let registry = HandlerRegistry::builder(DEFAULT_NAMESPACE).bind("blog").build();
        let missing = normalize("doesNotExist");
        assert!(!registry.exists(&missing));
        assert_eq!(registry.class_of(&missing), None);
    }

    #[test]
    fn test_bind_class_overrides_convention() {
        let registry = HandlerRegistry::builder(DEFAULT_NAMESPACE)
            .bind("blog")
            .bind_class("blog", "App::Legacy::BlogController")
            .build();
        assert_eq!(
            registry.class_of(&normalize("blog")).as_ref().map(ClassRef::as_str),
            Some("App::Legacy::BlogController")
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_qualify_without_namespace() {
        assert_eq!(qualify("", &normalize("blog")).as_str(), "Blog");
    }

    #[test]
    fn test_empty_registry() {
        let registry = HandlerRegistry::default();
        assert!(registry.is_empty());
        assert!(!registry.exists(&normalize("")));
    }
}
