//! Controller factory
//!
//! Resolves a controller name to a handler instance: normalize the name, look
//! up its binding, fall back to the not-found handler if configured, then let
//! the container build it.

use std::sync::Arc;

use super::binding::{BindingResolver, ClassRef};
use super::delegate::{ConstructionArgs, InstantiationDelegate, Params};
use super::fallback::FallbackPolicy;
use super::name::{normalize, HandlerIdentifier};
use crate::logger;

/// No binding for a controller name and no fallback configured
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no class for controller '{name}'")]
pub struct NoBindingError {
    /// Raw name as given to `resolve`, before normalization
    pub name: String,
}

/// The resolver reported a binding but gave no class for it
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("binding for '{identifier}' exists but has no class")]
pub struct MissingClassError {
    pub identifier: HandlerIdentifier,
}

/// Failure to pick a class for a controller name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocateError {
    #[error(transparent)]
    NoBinding(#[from] NoBindingError),

    #[error(transparent)]
    MissingClass(#[from] MissingClassError),
}

/// Failure of a single `resolve` call
#[derive(Debug, thiserror::Error)]
pub enum ResolveError<E> {
    #[error(transparent)]
    NoBinding(#[from] NoBindingError),

    #[error(transparent)]
    MissingClass(#[from] MissingClassError),

    /// Delegate failure, passed through untouched
    #[error(transparent)]
    Instantiation(E),
}

impl<E> From<LocateError> for ResolveError<E> {
    fn from(err: LocateError) -> Self {
        match err {
            LocateError::NoBinding(e) => Self::NoBinding(e),
            LocateError::MissingClass(e) => Self::MissingClass(e),
        }
    }
}

/// Where a resolved class reference came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Located {
    Binding(ClassRef),
    Fallback(ClassRef),
}

impl Located {
    pub const fn class(&self) -> &ClassRef {
        match self {
            Self::Binding(class) | Self::Fallback(class) => class,
        }
    }
}

/// Builds controllers by name
///
/// Holds no per-call state; `resolve` only reads the resolver and fallback,
/// so one factory can serve concurrent requests.
#[derive(Debug)]
pub struct ControllerFactory<R, D> {
    resolver: R,
    fallback: FallbackPolicy,
    delegate: D,
}

impl<R, D> ControllerFactory<R, D>
where
    R: BindingResolver,
{
    pub const fn new(resolver: R, fallback: FallbackPolicy, delegate: D) -> Self {
        Self {
            resolver,
            fallback,
            delegate,
        }
    }

    pub const fn resolver(&self) -> &R {
        &self.resolver
    }

    pub const fn fallback(&self) -> &FallbackPolicy {
        &self.fallback
    }

    /// Find the class that should serve `raw_name`
    ///
    /// Asks the resolver exactly once. The fallback is only consulted when
    /// that check reports no binding.
    pub fn locate(&self, raw_name: &str) -> Result<Located, LocateError> {
        let identifier = normalize(raw_name);
        if self.resolver.exists(&identifier) {
            return match self.resolver.class_of(&identifier) {
                Some(class) => Ok(Located::Binding(class)),
                None => Err(MissingClassError { identifier }.into()),
            };
        }
        match self.fallback.fallback() {
            Some(class) => Ok(Located::Fallback(class.clone())),
            None => Err(NoBindingError {
                name: raw_name.to_string(),
            }
            .into()),
        }
    }

    /// Create the controller for `raw_name`
    pub fn resolve<C>(
        &self,
        context: Arc<C>,
        raw_name: &str,
        params: Arc<Params>,
    ) -> Result<D::Handler, ResolveError<D::Error>>
    where
        D: InstantiationDelegate<C>,
    {
        self.resolve_located(context, raw_name, params)
            .map(|(_, handler)| handler)
    }

    /// Like [`resolve`](Self::resolve), also reporting which class was built
    pub fn resolve_located<C>(
        &self,
        context: Arc<C>,
        raw_name: &str,
        params: Arc<Params>,
    ) -> Result<(Located, D::Handler), ResolveError<D::Error>>
    where
        D: InstantiationDelegate<C>,
    {
        let located = self.locate(raw_name)?;
        match &located {
            Located::Binding(class) => logger::log_controller_resolved(raw_name, class),
            Located::Fallback(class) => logger::log_fallback_used(raw_name, class),
        }
        let handler = self
            .delegate
            .new_instance(located.class(), ConstructionArgs { context, params })
            .map_err(ResolveError::Instantiation)?;
        Ok((located, handler))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::binding::{HandlerRegistry, DEFAULT_NAMESPACE};
    use std::cell::RefCell;
    use std::sync::Mutex;

    struct Ctx;

    /// Records every call and returns the class it was asked to build
    #[derive(Default)]
    struct RecordingDelegate {
        calls: Mutex<Vec<(ClassRef, ConstructionArgs<Ctx>)>>,
    }

    impl InstantiationDelegate<Ctx> for RecordingDelegate {
        type Handler = ClassRef;
        type Error = String;

        fn new_instance(&self, class: &ClassRef, args: ConstructionArgs<Ctx>) -> Result<ClassRef, String> {
            self.calls.lock().unwrap().push((class.clone(), args));
            if class.as_str() == "Framework::Web::Broken" {
                return Err("constructor exploded".to_string());
            }
            Ok(class.clone())
        }
    }

    /// Resolver that records every existence check
    struct RecordingResolver {
        inner: HandlerRegistry,
        checks: RefCell<Vec<HandlerIdentifier>>,
    }

    impl BindingResolver for RecordingResolver {
        fn exists(&self, identifier: &HandlerIdentifier) -> bool {
            self.checks.borrow_mut().push(identifier.clone());
            self.inner.exists(identifier)
        }

        fn class_of(&self, identifier: &HandlerIdentifier) -> Option<ClassRef> {
            self.inner.class_of(identifier)
        }
    }

    fn registry() -> HandlerRegistry {
        HandlerRegistry::builder(DEFAULT_NAMESPACE)
            .bind("blog")
            .bind("broken")
            .build()
    }

    fn params(pairs: &[(&str, i64)]) -> Arc<Params> {
        let mut params = Params::new();
        for (k, v) in pairs {
            params.insert((*k).to_string(), (*v).into());
        }
        Arc::new(params)
    }

    #[test]
    fn test_resolve_existing_binding() {
        let factory = ControllerFactory::new(
            registry(),
            FallbackPolicy::from(Some("ErrorHandler".to_string())),
            RecordingDelegate::default(),
        );
        let ctx = Arc::new(Ctx);
        let p = params(&[("id", 5)]);

        let handler = factory.resolve(Arc::clone(&ctx), "blog", Arc::clone(&p)).unwrap();
        assert_eq!(handler.as_str(), "Framework::Web::Blog");

        let calls = factory.delegate.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let (class, args) = &calls[0];
        assert_eq!(class.as_str(), "Framework::Web::Blog");
        assert!(Arc::ptr_eq(&args.context, &ctx));
        assert!(Arc::ptr_eq(&args.params, &p));
        assert_eq!(args.params.get("id"), Some(&serde_json::json!(5)));
    }

    #[test]
    fn test_resolve_uses_fallback_for_unknown_name() {
        let factory = ControllerFactory::new(
            RecordingResolver {
                inner: registry(),
                checks: RefCell::new(Vec::new()),
            },
            FallbackPolicy::from(Some("ErrorHandler".to_string())),
            RecordingDelegate::default(),
        );

        let handler = factory
            .resolve(Arc::new(Ctx), "doesNotExist", params(&[]))
            .unwrap();
        assert_eq!(handler.as_str(), "ErrorHandler");

        let checks = factory.resolver().checks.borrow();
        assert_eq!(checks.len(), 1);
        assert_eq!(checks[0].as_str(), "Doesnotexist");
    }

    #[test]
    fn test_resolve_without_fallback_fails_with_raw_name() {
        let factory = ControllerFactory::new(registry(), FallbackPolicy::none(), RecordingDelegate::default());

        let err = factory
            .resolve(Arc::new(Ctx), "doesNotExist", params(&[]))
            .unwrap_err();
        match err {
            ResolveError::NoBinding(e) => assert_eq!(e.name, "doesNotExist"),
            other => panic!("unexpected error: {other}"),
        }
        assert!(factory.delegate.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_binding_wins_over_fallback() {
        // A degenerate fallback that points at an empty class name
        let factory = ControllerFactory::new(
            registry(),
            FallbackPolicy::from(Some(String::new())),
            RecordingDelegate::default(),
        );
        assert_eq!(
            factory.locate("BLOG").unwrap(),
            Located::Binding(ClassRef::from("Framework::Web::Blog"))
        );
        assert_eq!(
            factory.locate("nope").unwrap(),
            Located::Fallback(ClassRef::from(""))
        );
    }

    #[test]
    fn test_delegate_error_propagates_verbatim() {
        let factory = ControllerFactory::new(registry(), FallbackPolicy::none(), RecordingDelegate::default());
        let err = factory
            .resolve(Arc::new(Ctx), "broken", params(&[]))
            .unwrap_err();
        match err {
            ResolveError::Instantiation(e) => assert_eq!(e, "constructor exploded"),
            other => panic!("unexpected error: {other}"),
        }
    }

    /// Claims every name exists but never has a class for it
    struct ClasslessResolver;

    impl BindingResolver for ClasslessResolver {
        fn exists(&self, _identifier: &HandlerIdentifier) -> bool {
            true
        }

        fn class_of(&self, _identifier: &HandlerIdentifier) -> Option<ClassRef> {
            None
        }
    }

    #[test]
    fn test_existing_binding_without_class_skips_fallback() {
        let factory = ControllerFactory::new(
            ClasslessResolver,
            FallbackPolicy::from(Some("ErrorHandler".to_string())),
            RecordingDelegate::default(),
        );

        assert_eq!(
            factory.locate("blog"),
            Err(LocateError::MissingClass(MissingClassError {
                identifier: normalize("blog"),
            }))
        );
        let err = factory
            .resolve(Arc::new(Ctx), "blog", params(&[]))
            .unwrap_err();
        match err {
            ResolveError::MissingClass(e) => {
                assert_eq!(e.to_string(), "binding for 'Blog' exists but has no class");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(factory.delegate.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_resolve_located_reports_source() {
        let factory = ControllerFactory::new(
            registry(),
            FallbackPolicy::from(Some("ErrorHandler".to_string())),
            RecordingDelegate::default(),
        );

        let (located, handler) = factory
            .resolve_located(Arc::new(Ctx), "blog", params(&[]))
            .unwrap();
        assert_eq!(located, Located::Binding(ClassRef::from("Framework::Web::Blog")));
        assert_eq!(handler.as_str(), "Framework::Web::Blog");

        let (located, _) = factory
            .resolve_located(Arc::new(Ctx), "missing", params(&[]))
            .unwrap();
        assert_eq!(located, Located::Fallback(ClassRef::from("ErrorHandler")));
    }

    #[test]
    fn test_no_binding_error_message() {
        let err = NoBindingError {
            name: "doesNotExist".to_string(),
        };
        assert_eq!(err.to_string(), "no class for controller 'doesNotExist'");
    }

    #[test]
    fn test_factory_is_shareable_across_threads() {
        use crate::web::delegate::Container;

        let container: Container<Ctx, String> =
            Container::new().register("Framework::Web::Blog", |args: ConstructionArgs<Ctx>| {
                Ok(format!("blog:{}", args.params.len()))
            });
        let factory = Arc::new(ControllerFactory::new(registry(), FallbackPolicy::none(), container));

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let factory = Arc::clone(&factory);
                std::thread::spawn(move || {
                    factory
                        .resolve(Arc::new(Ctx), "Blog", params(&[("n", i)]))
                        .unwrap()
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), "blog:1");
        }
    }
}
