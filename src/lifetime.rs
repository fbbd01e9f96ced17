//! Service lifetime definitions.

/// Service lifetimes controlling instance caching behavior
///
/// Defines how instances produced for a service identifier are created,
/// cached, and shared by the container.
///
/// # Lifetime Characteristics
///
/// - **Singleton**: Constructed once, cached, and shared by every request
/// - **Transient**: Constructed fresh on every request, never cached
///
/// # Examples
///
/// ```rust
/// use keyed_di::{DiContainer, Factory, Instance, RegisterOptions};
///
/// struct Database { url: String }
///
/// let container = DiContainer::new();
///
/// // Singleton: one instance for the container's lifetime
/// container.register_singleton(
///     Some(Factory::new(|| Instance::new(Database {
///         url: "postgres://localhost".to_string(),
///     }))),
///     RegisterOptions::new("Database"),
/// );
///
/// // Transient: a new instance per request
/// container.register_transient(
///     Some(Factory::new(|| Instance::new(String::from("fresh")))),
///     RegisterOptions::new("RequestId"),
/// );
///
/// let a = container.get("Database").unwrap();
/// let b = container.get("Database").unwrap();
/// assert!(a.ptr_eq(&b)); // Same instance
///
/// let x = container.get("RequestId").unwrap();
/// let y = container.get("RequestId").unwrap();
/// assert!(!x.ptr_eq(&y)); // Always different
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifetime {
    /// Single instance per container, cached forever
    ///
    /// Singleton services are constructed once on first request and then
    /// cached for the lifetime of the container. Every subsequent request
    /// for the same identifier returns the same instance, including
    /// requests made while resolving other services' dependencies.
    Singleton,
    /// New instance per resolution, never cached
    ///
    /// Transient services construct a fresh instance every time their
    /// identifier is requested. Their own singleton dependencies are still
    /// shared through the instance cache.
    Transient,
}
