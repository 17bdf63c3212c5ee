//! Handler instantiation
//!
//! The factory never builds handlers itself. It hands a class reference and
//! the construction arguments to an [`InstantiationDelegate`], normally the
//! [`Container`] assembled at startup.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::binding::ClassRef;

/// Per-request parameters, kept in insertion order
pub type Params = serde_json::Map<String, serde_json::Value>;

/// Boxed error returned by handler constructors
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Arguments forwarded to a handler constructor
///
/// `context` and `params` are the very values given to
/// [`ControllerFactory::resolve`](super::ControllerFactory::resolve).
pub struct ConstructionArgs<C> {
    pub context: Arc<C>,
    pub params: Arc<Params>,
}

impl<C> Clone for ConstructionArgs<C> {
    fn clone(&self) -> Self {
        Self {
            context: Arc::clone(&self.context),
            params: Arc::clone(&self.params),
        }
    }
}

impl<C> fmt::Debug for ConstructionArgs<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructionArgs")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Builds handler instances from a class reference
///
/// Failures are returned as-is; callers must not expect retries.
pub trait InstantiationDelegate<C> {
    type Handler;
    type Error;

    fn new_instance(
        &self,
        class: &ClassRef,
        args: ConstructionArgs<C>,
    ) -> Result<Self::Handler, Self::Error>;
}

/// Errors raised by [`Container`]
#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    #[error("no constructor registered for class '{class}'")]
    Unresolvable { class: ClassRef },

    #[error("failed to construct '{class}': {source}")]
    Construction {
        class: ClassRef,
        #[source]
        source: BoxError,
    },
}

type Constructor<C, H> = Arc<dyn Fn(ConstructionArgs<C>) -> Result<H, BoxError> + Send + Sync>;

/// Constructor table keyed by class reference
pub struct Container<C, H> {
    constructors: HashMap<ClassRef, Constructor<C, H>>,
}

impl<C, H> Container<C, H> {
    pub fn new() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// Register the constructor for a class, replacing any previous one
    #[must_use]
    pub fn register<F>(mut self, class: impl Into<ClassRef>, constructor: F) -> Self
    where
        F: Fn(ConstructionArgs<C>) -> Result<H, BoxError> + Send + Sync + 'static,
    {
        self.constructors.insert(class.into(), Arc::new(constructor));
        self
    }
}

impl<C, H> Default for Container<C, H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, H> fmt::Debug for Container<C, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("classes", &self.constructors.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<C, H> InstantiationDelegate<C> for Container<C, H> {
    type Handler = H;
    type Error = ContainerError;

    fn new_instance(&self, class: &ClassRef, args: ConstructionArgs<C>) -> Result<H, ContainerError> {
        let constructor = self
            .constructors
            .get(class)
            .ok_or_else(|| ContainerError::Unresolvable {
                class: class.clone(),
            })?;
        constructor(args).map_err(|source| ContainerError::Construction {
            class: class.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(params: Params) -> ConstructionArgs<&'static str> {
        ConstructionArgs {
            context: Arc::new("ctx"),
            params: Arc::new(params),
        }
    }

    #[test]
    fn test_container_builds_registered_class() {
        let container: Container<&'static str, String> = Container::new()
            .register("Framework::Web::Blog", |a: ConstructionArgs<&'static str>| {
                Ok(format!("blog for {} with {} params", a.context, a.params.len()))
            });

        let mut params = Params::new();
        params.insert("id".to_string(), 5.into());
        let built = container
            .new_instance(&ClassRef::from("Framework::Web::Blog"), args(params))
            .unwrap();
        assert_eq!(built, "blog for ctx with 1 params");
    }

    #[test]
    fn test_container_unresolvable() {
        let container: Container<&'static str, String> = Container::default();
        let err = container
            .new_instance(&ClassRef::from("Missing"), args(Params::new()))
            .unwrap_err();
        assert!(matches!(err, ContainerError::Unresolvable { ref class } if class.as_str() == "Missing"));
        assert_eq!(err.to_string(), "no constructor registered for class 'Missing'");
    }

    #[test]
    fn test_container_constructor_failure() {
        let container: Container<&'static str, String> =
            Container::new().register("Broken", |_| Err("database offline".into()));
        let err = container
            .new_instance(&ClassRef::from("Broken"), args(Params::new()))
            .unwrap_err();
        assert!(matches!(err, ContainerError::Construction { .. }));
        assert!(err.to_string().contains("database offline"));
    }

    #[test]
    fn test_construction_args_clone_shares_values() {
        let original = args(Params::new());
        let copy = original.clone();
        assert!(Arc::ptr_eq(&original.context, &copy.context));
        assert!(Arc::ptr_eq(&original.params, &copy.params));
    }
}
