//! Construction-source descriptors used at registration time.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use crate::instance::Instance;
use crate::metadata::{
    ConstructorArgument, ConstructorArgumentList, ServiceIdentifier,
    CONSTRUCTOR_ARGUMENTS_IDENTIFIER,
};

pub(crate) type ConstructFn = Arc<dyn Fn(Vec<Instance>) -> Instance + Send + Sync>;

/// A zero-argument construction function.
///
/// A factory owns its entire construction: no dependency list is consulted
/// and no arguments are injected. Whatever it returns — including an unset
/// instance — becomes the resolved value for its identifier. Panics raised
/// inside the factory propagate to the caller of
/// [`get`](crate::DiContainer::get) unmodified.
///
/// # Examples
///
/// ```rust
/// use keyed_di::{DiContainer, Factory, Instance, RegisterOptions};
///
/// struct Clock;
///
/// let container = DiContainer::new();
/// container.register_singleton(
///     Some(Factory::new(|| Instance::new(Clock))),
///     RegisterOptions::new("IClock"),
/// );
/// assert!(container.get("IClock").unwrap().downcast::<Clock>().is_some());
/// ```
#[derive(Clone)]
pub struct Factory {
    make: Arc<dyn Fn() -> Instance + Send + Sync>,
}

impl Factory {
    /// Wraps a closure as a registerable factory.
    pub fn new<F>(make: F) -> Self
    where
        F: Fn() -> Instance + Send + Sync + 'static,
    {
        Factory { make: Arc::new(make) }
    }

    pub(crate) fn invoke(&self) -> Instance {
        (self.make)()
    }
}

/// A constructor-shaped construction source plus the metadata attached to it.
///
/// The constructor closure receives one positional [`Instance`] per entry in
/// the attached constructor-argument list: resolved dependencies, unset
/// handles for skipped positions, and deferred handles for cyclic
/// positions. Panics raised inside the constructor propagate unmodified.
///
/// Metadata is an open keyed bag; the container itself only ever reads the
/// constructor-argument list under
/// [`CONSTRUCTOR_ARGUMENTS_IDENTIFIER`], which
/// [`with_constructor_arguments`](Implementation::with_constructor_arguments)
/// attaches for you.
///
/// # Examples
///
/// ```rust
/// use keyed_di::{DiContainer, Implementation, Instance, RegisterOptions};
///
/// struct Logger;
/// struct Server { logger: std::sync::Arc<Logger> }
///
/// let container = DiContainer::new();
/// container.register_singleton(None, RegisterOptions::new("ILogger")
///     .with_implementation(Implementation::new(|_| Instance::new(Logger))));
/// container.register_singleton(None, RegisterOptions::new("IServer")
///     .with_implementation(
///         Implementation::new(|args| Instance::new(Server {
///             logger: args[0].downcast::<Logger>().unwrap(),
///         }))
///         .with_constructor_arguments([Some("ILogger".to_string())]),
///     ));
///
/// let server = container.get("IServer").unwrap();
/// assert!(server.downcast::<Server>().is_some());
/// ```
pub struct Implementation {
    construct: ConstructFn,
    metadata: HashMap<&'static str, Box<dyn Any + Send + Sync>>,
}

impl Implementation {
    /// Wraps a constructor closure as a registerable implementation.
    pub fn new<F>(construct: F) -> Self
    where
        F: Fn(Vec<Instance>) -> Instance + Send + Sync + 'static,
    {
        Implementation {
            construct: Arc::new(construct),
            metadata: HashMap::new(),
        }
    }

    /// Attaches a metadata value under the given key.
    ///
    /// The container treats metadata as read-only; external tooling may
    /// attach whatever it wants alongside the well-known keys.
    pub fn with_metadata<M: Any + Send + Sync>(mut self, key: &'static str, value: M) -> Self {
        self.metadata.insert(key, Box::new(value));
        self
    }

    /// Attaches the constructor-argument list under the well-known key.
    ///
    /// Equivalent to `with_metadata(CONSTRUCTOR_ARGUMENTS_IDENTIFIER, ...)`.
    pub fn with_constructor_arguments<I>(self, arguments: I) -> Self
    where
        I: IntoIterator<Item = ConstructorArgument>,
    {
        self.with_metadata(
            CONSTRUCTOR_ARGUMENTS_IDENTIFIER,
            arguments.into_iter().collect::<ConstructorArgumentList>(),
        )
    }

    /// Reads a typed metadata value, if present under the given key.
    pub fn metadata<M: Any>(&self, key: &'static str) -> Option<&M> {
        self.metadata.get(key)?.downcast_ref::<M>()
    }

    pub(crate) fn construct_fn(&self) -> ConstructFn {
        self.construct.clone()
    }
}

/// Options accompanying a registration call.
///
/// Carries the mandatory service identifier and, optionally, the
/// [`Implementation`] to construct instances from. Exactly one construction
/// source — the factory argument of the registration call or the
/// implementation here — should be supplied; a registration with neither is
/// accepted and fails only when the identifier is first resolved.
pub struct RegisterOptions {
    pub(crate) identifier: ServiceIdentifier,
    pub(crate) implementation: Option<Implementation>,
}

impl RegisterOptions {
    /// Creates options for the given identifier.
    pub fn new(identifier: impl Into<ServiceIdentifier>) -> Self {
        RegisterOptions {
            identifier: identifier.into(),
            implementation: None,
        }
    }

    /// Supplies the implementation to construct instances from.
    pub fn with_implementation(mut self, implementation: Implementation) -> Self {
        self.implementation = Some(implementation);
        self
    }
}
