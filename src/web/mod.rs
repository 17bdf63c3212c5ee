//! Controller resolution
//!
//! Maps symbolic controller names to handler instances:
//! - name normalization
//! - binding lookup against an immutable registry
//! - not-found fallback
//! - construction through an injected container

pub mod binding;
pub mod delegate;
pub mod factory;
pub mod fallback;
pub mod name;

pub use binding::{BindingResolver, ClassRef, HandlerRegistry, DEFAULT_NAMESPACE};
pub use delegate::{
    BoxError, ConstructionArgs, Container, ContainerError, InstantiationDelegate, Params,
};
pub use factory::{ControllerFactory, LocateError, Located, MissingClassError, NoBindingError, ResolveError};
pub use fallback::FallbackPolicy;
pub use name::{normalize, HandlerIdentifier};
