//! The dependency-injection container.
//!
//! This module contains the [`DiContainer`] type: the registration API on
//! one side and the resolution entry point on the other. The recursive
//! resolution engine lives in the sibling `resolve` module.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Instant;

use once_cell::sync::Lazy;

use crate::cache::InstanceCache;
use crate::descriptors::{Factory, RegisterOptions};
use crate::error::{DiError, DiResult};
use crate::instance::Instance;
use crate::lifetime::Lifetime;
use crate::metadata::{ConstructorArgumentList, ServiceIdentifier, CONSTRUCTOR_ARGUMENTS_IDENTIFIER};
use crate::observer::{DiObserver, Observers};
use crate::registration::{Registration, Registry, Source};

mod resolve;

static GLOBAL_CONTAINER: Lazy<DiContainer> = Lazy::new(DiContainer::new);

/// A dependency-injection container that holds services and produces
/// instances of them as required.
///
/// Services are filed under opaque string identifiers. Registration
/// associates an identifier with a lifetime and a construction source;
/// [`get`](DiContainer::get) resolves an identifier into a fully
/// constructed instance, recursively building dependencies, sharing
/// singletons, and breaking dependency cycles with lazy back-references.
///
/// The container is thread-safe: its registry and instance cache are
/// protected internally, and no lock is held while user construction code
/// runs. Resolution itself is fully synchronous within one call stack.
///
/// # Examples
///
/// ```rust
/// use keyed_di::{DiContainer, Implementation, Instance, RegisterOptions};
/// use std::sync::Arc;
///
/// struct Database { url: String }
/// struct UserService { db: Arc<Database> }
///
/// let container = DiContainer::new();
/// container.register_singleton(None, RegisterOptions::new("IDatabase")
///     .with_implementation(Implementation::new(|_| Instance::new(Database {
///         url: "postgres://localhost".to_string(),
///     }))));
/// container.register_singleton(None, RegisterOptions::new("IUserService")
///     .with_implementation(
///         Implementation::new(|args| Instance::new(UserService {
///             db: args[0].downcast::<Database>().unwrap(),
///         }))
///         .with_constructor_arguments([Some("IDatabase".to_string())]),
///     ));
///
/// let users = container.get("IUserService").unwrap();
/// let users = users.downcast::<UserService>().unwrap();
/// assert_eq!(users.db.url, "postgres://localhost");
/// ```
pub struct DiContainer {
    /// A map between identifiers and the services that should be dependency injected
    pub(crate) constructor_arguments: RwLock<HashMap<ServiceIdentifier, ConstructorArgumentList>>,
    /// A map between identifiers and their registration records
    pub(crate) registry: RwLock<Registry>,
    /// A map between identifiers and concrete singleton instances
    pub(crate) instances: InstanceCache,
    pub(crate) observers: Observers,
}

impl DiContainer {
    /// Creates a new empty container.
    pub fn new() -> Self {
        Self {
            constructor_arguments: RwLock::new(HashMap::new()),
            registry: RwLock::new(Registry::new()),
            instances: InstanceCache::new(),
            observers: Observers::new(),
        }
    }

    /// Returns the process-wide container, created lazily on first access.
    ///
    /// Using the global container is strictly opt-in; nothing else in the
    /// crate touches it, and independent [`DiContainer::new`] instances
    /// remain fully isolated from it.
    pub fn global() -> &'static DiContainer {
        &GLOBAL_CONTAINER
    }

    /// Registers a service that is instantiated once per container.
    ///
    /// Every request for the identifier returns the same instance. Exactly
    /// one construction source should be supplied: either `factory` or
    /// `options.implementation`. A registration with neither is accepted
    /// here and fails when the identifier is first resolved. Registering an
    /// identifier that already exists silently replaces the prior entry.
    ///
    /// # Panics
    ///
    /// Panics if the identifier in `options` is empty; that is a misuse of
    /// the API, not a runtime condition.
    pub fn register_singleton(&self, factory: Option<Factory>, options: RegisterOptions) {
        self.register(Lifetime::Singleton, factory, options);
    }

    /// Registers a service that is instantiated on every request.
    ///
    /// Every call to [`get`](DiContainer::get) returns a distinct instance,
    /// though singleton dependencies inside it are still shared. The
    /// construction-source and replacement rules match
    /// [`register_singleton`](DiContainer::register_singleton).
    ///
    /// # Panics
    ///
    /// Panics if the identifier in `options` is empty.
    pub fn register_transient(&self, factory: Option<Factory>, options: RegisterOptions) {
        self.register(Lifetime::Transient, factory, options);
    }

    /// Returns true if a service has been registered for the identifier.
    ///
    /// Pure registry membership: whether an instance has been constructed
    /// yet does not enter into it.
    ///
    /// # Panics
    ///
    /// Panics if `identifier` is empty.
    pub fn has(&self, identifier: &str) -> bool {
        assert!(!identifier.is_empty(), "has requires a non-empty service identifier");
        self.registry.read().unwrap().contains_key(identifier)
    }

    /// Resolves the identifier into a constructed instance.
    ///
    /// Dependencies are constructed recursively; singletons are served from
    /// the instance cache after their first construction; dependency cycles
    /// are broken with lazy back-references (see
    /// [`LazyRef`](crate::LazyRef) for the read-after-construction
    /// contract).
    ///
    /// Fails with [`DiError::NotRegistered`] when the identifier has no
    /// registration, [`DiError::MissingDependency`] when a transitive
    /// dependency has none, and [`DiError::NoImplementation`] when a record
    /// carries no construction source. Panics raised by user factories and
    /// constructors propagate unmodified.
    ///
    /// # Panics
    ///
    /// Panics if `identifier` is empty.
    pub fn get(&self, identifier: &str) -> DiResult<Instance> {
        assert!(!identifier.is_empty(), "get requires a non-empty service identifier");

        let outcome = self
            .construct_instance(identifier, &[])
            .and_then(|constructed| {
                constructed.ok_or_else(|| DiError::NotRegistered {
                    identifier: identifier.to_owned(),
                })
            });

        if let Err(error) = &outcome {
            self.observers.resolution_failed(identifier, error);
        }
        outcome
    }

    /// Adds a diagnostic observer for resolution events.
    ///
    /// Observers see every resolution step, including recursive dependency
    /// construction. Keep implementations lightweight; they run
    /// synchronously during resolution.
    pub fn add_observer(&self, observer: Arc<dyn DiObserver>) {
        self.observers.add(observer);
    }

    /// Registers a service
    fn register(&self, lifetime: Lifetime, factory: Option<Factory>, options: RegisterOptions) {
        let RegisterOptions { identifier, implementation } = options;
        assert!(
            !identifier.is_empty(),
            "a registration requires a non-empty service identifier"
        );

        // Take the constructor arguments the implementation carries, so
        // resolution never has to re-inspect the implementation.
        let arguments = implementation
            .as_ref()
            .and_then(|implementation| {
                implementation
                    .metadata::<ConstructorArgumentList>(CONSTRUCTOR_ARGUMENTS_IDENTIFIER)
                    .cloned()
            })
            .unwrap_or_default();
        self.constructor_arguments
            .write()
            .unwrap()
            .insert(identifier.clone(), arguments);

        // An implementation wins over a factory when both are supplied.
        let source = match implementation {
            Some(implementation) => Some(Source::Constructor(implementation.construct_fn())),
            None => factory.map(Source::Factory),
        };
        self.registry
            .write()
            .unwrap()
            .insert(identifier, Registration::new(lifetime, source));
    }

    pub(crate) fn registration(&self, identifier: &str) -> Option<Registration> {
        self.registry.read().unwrap().get(identifier).cloned()
    }

    pub(crate) fn arguments_for(&self, identifier: &str) -> ConstructorArgumentList {
        self.constructor_arguments
            .read()
            .unwrap()
            .get(identifier)
            .cloned()
            .unwrap_or_default()
    }

    pub(crate) fn observe<F>(&self, identifier: &str, construct: F) -> DiResult<Option<Instance>>
    where
        F: FnOnce() -> DiResult<Option<Instance>>,
    {
        if !self.observers.has_observers() {
            return construct();
        }

        self.observers.resolving(identifier);
        let start = Instant::now();
        let result = construct();
        if let Ok(Some(_)) = &result {
            self.observers.resolved(identifier, start.elapsed());
        }
        result
    }
}

impl Default for DiContainer {
    fn default() -> Self {
        Self::new()
    }
}
