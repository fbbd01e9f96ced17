//! Error types for the dependency injection container.

use std::fmt;

use crate::metadata::ServiceIdentifier;

/// Dependency injection errors
///
/// Represents the failure conditions of the resolution machinery itself.
/// Exceptions raised inside user-supplied factories and constructors are
/// never converted into this type; they propagate to the caller of
/// [`get`](crate::DiContainer::get) as the panics they are.
///
/// Each variant carries enough of the resolution state to render a
/// human-readable dependency path, e.g. `ServiceC -> ServiceB`.
///
/// # Examples
///
/// ```rust
/// use keyed_di::{DiContainer, DiError};
///
/// let container = DiContainer::new();
/// match container.get("IFoo") {
///     Err(DiError::NotRegistered { identifier }) => {
///         assert_eq!(identifier, "IFoo");
///     }
///     _ => unreachable!(),
/// }
/// ```
#[derive(Debug, Clone)]
pub enum DiError {
    /// The requested identifier has no registration record
    NotRegistered {
        /// Identifier the caller asked for
        identifier: ServiceIdentifier,
    },
    /// A transitively required identifier has no registration record
    ///
    /// The chain runs from the outermost requested service down to the
    /// service whose constructor needed the missing dependency.
    MissingDependency {
        /// Identifier that could not be found in the registry
        dependency: ServiceIdentifier,
        /// Ancestor path ending at the service under construction
        chain: Vec<ServiceIdentifier>,
    },
    /// A registration record exists but carries neither a factory nor an
    /// implementation
    NoImplementation {
        /// Identifier whose record is unusable
        identifier: ServiceIdentifier,
        /// Ancestor path ending at the unusable identifier
        chain: Vec<ServiceIdentifier>,
    },
}

impl fmt::Display for DiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiError::NotRegistered { identifier } => {
                write!(
                    f,
                    "Could not instantiate service: '{}': The service wasn't found in the registry.",
                    identifier
                )
            }
            DiError::MissingDependency { dependency, chain } => {
                let service = chain.last().map(String::as_str).unwrap_or(dependency.as_str());
                write!(
                    f,
                    "Could not instantiate service: '{}': Dependency '{}' was not found in the service registry.",
                    service, dependency
                )?;
                if chain.len() > 1 {
                    write!(f, " Dependency chain: {}", chain.join(" -> "))?;
                }
                Ok(())
            }
            DiError::NoImplementation { identifier, chain } => {
                write!(
                    f,
                    "Could not instantiate service: '{}': No implementation was given!",
                    identifier
                )?;
                if chain.len() > 1 {
                    write!(f, " Dependency chain: {}", chain.join(" -> "))?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for DiError {}

/// Result type for DI operations
///
/// A convenience type alias for `Result<T, DiError>` used throughout the
/// crate, following the common Rust pattern of a crate-specific Result type
/// to reduce boilerplate in function signatures.
///
/// # Examples
///
/// ```rust
/// use keyed_di::{DiResult, DiError, Instance};
///
/// fn lookup() -> DiResult<Instance> {
///     Err(DiError::NotRegistered { identifier: "ICache".to_string() })
/// }
///
/// match lookup() {
///     Ok(instance) => drop(instance),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub type DiResult<T> = Result<T, DiError>;
