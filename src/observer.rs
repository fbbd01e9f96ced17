//! Diagnostic observers for resolution traceability.
//!
//! This module provides hooks for observing resolution events, enabling
//! structured tracing, performance monitoring, and debugging of service
//! graphs without coupling the container to a logging framework.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::error::DiError;

/// Observer trait for resolution events.
///
/// Observers see every resolution step, including the recursive ones taken
/// while constructing a dependency graph. Calls are made synchronously
/// during resolution; keep implementations lightweight.
///
/// # Examples
///
/// ```rust
/// use keyed_di::{DiContainer, DiError, DiObserver, Factory, Instance, RegisterOptions};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// struct TracingObserver;
///
/// impl DiObserver for TracingObserver {
///     fn resolving(&self, identifier: &str) {
///         println!("Resolving: {}", identifier);
///     }
///
///     fn resolved(&self, identifier: &str, duration: Duration) {
///         println!("Resolved: {} in {:?}", identifier, duration);
///     }
///
///     fn resolution_failed(&self, identifier: &str, error: &DiError) {
///         eprintln!("Failed: {}: {}", identifier, error);
///     }
/// }
///
/// let container = DiContainer::new();
/// container.add_observer(Arc::new(TracingObserver));
/// container.register_singleton(
///     Some(Factory::new(|| Instance::new(42usize))),
///     RegisterOptions::new("Answer"),
/// );
/// let _ = container.get("Answer"); // Observed
/// ```
pub trait DiObserver: Send + Sync {
    /// Called when resolution of an identifier starts.
    fn resolving(&self, identifier: &str);

    /// Called when an identifier resolved successfully.
    ///
    /// `duration` is the time elapsed from `resolving` to `resolved`,
    /// including the construction of transitive dependencies.
    fn resolved(&self, identifier: &str, duration: Duration);

    /// Called when resolution of an identifier failed.
    ///
    /// Only resolution-machinery failures are reported here; panics from
    /// user construction code unwind past the observers.
    fn resolution_failed(&self, identifier: &str, error: &DiError);
}

/// Container for registered observers.
///
/// Designed to have minimal overhead when no observers are registered.
#[derive(Default)]
pub(crate) struct Observers {
    observers: RwLock<Vec<Arc<dyn DiObserver>>>,
}

impl Observers {
    pub(crate) fn new() -> Self {
        Self { observers: RwLock::new(Vec::new()) }
    }

    pub(crate) fn add(&self, observer: Arc<dyn DiObserver>) {
        self.observers.write().unwrap().push(observer);
    }

    #[inline]
    pub(crate) fn has_observers(&self) -> bool {
        !self.observers.read().unwrap().is_empty()
    }

    #[inline]
    pub(crate) fn resolving(&self, identifier: &str) {
        for observer in self.observers.read().unwrap().iter() {
            observer.resolving(identifier);
        }
    }

    #[inline]
    pub(crate) fn resolved(&self, identifier: &str, duration: Duration) {
        for observer in self.observers.read().unwrap().iter() {
            observer.resolved(identifier, duration);
        }
    }

    #[inline]
    pub(crate) fn resolution_failed(&self, identifier: &str, error: &DiError) {
        for observer in self.observers.read().unwrap().iter() {
            observer.resolution_failed(identifier, error);
        }
    }
}

/// Built-in observer that logs events to stdout.
///
/// A simple implementation useful for development and debugging. For
/// production use, implement a custom observer that integrates with your
/// logging infrastructure.
///
/// # Examples
///
/// ```rust
/// use keyed_di::{DiContainer, LoggingObserver};
/// use std::sync::Arc;
///
/// let container = DiContainer::new();
/// container.add_observer(Arc::new(LoggingObserver::new()));
/// // All resolutions will be logged to stdout
/// ```
pub struct LoggingObserver {
    prefix: String,
}

impl LoggingObserver {
    /// Creates a new logging observer with default prefix.
    pub fn new() -> Self {
        Self { prefix: "[keyed-di]".to_string() }
    }

    /// Creates a new logging observer with a custom prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }
}

impl Default for LoggingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl DiObserver for LoggingObserver {
    fn resolving(&self, identifier: &str) {
        println!("{} Resolving: {}", self.prefix, identifier);
    }

    fn resolved(&self, identifier: &str, duration: Duration) {
        println!("{} Resolved: {} in {:?}", self.prefix, identifier, duration);
    }

    fn resolution_failed(&self, identifier: &str, error: &DiError) {
        eprintln!("{} FAILED {}: {}", self.prefix, identifier, error);
    }
}
