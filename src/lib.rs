//! # keyed-di
//!
//! String-keyed dependency injection for Rust: a registry mapping opaque
//! service identifiers to construction strategies, and a resolution engine
//! that turns an identifier into a fully constructed object graph.
//!
//! ## Features
//!
//! - **Singleton and transient lifetimes**: cached-and-shared or
//!   fresh-per-request construction
//! - **Recursive injection**: constructor-argument lists resolve nested
//!   dependencies automatically
//! - **Cycle breaking**: dependency cycles of any length terminate via lazy
//!   back-references
//! - **Structured diagnostics**: broken dependency chains are reported as
//!   `A -> B -> C` paths; user panics pass through untouched
//! - **Thread-safe**: internal locking, no lock held across user code
//!
//! ## Quick Start
//!
//! ```rust
//! use keyed_di::{DiContainer, Implementation, Instance, RegisterOptions};
//! use std::sync::Arc;
//!
//! // Define your services
//! struct Database {
//!     connection_string: String,
//! }
//!
//! struct UserService {
//!     db: Arc<Database>,
//! }
//!
//! // Register services
//! let container = DiContainer::new();
//! container.register_singleton(None, RegisterOptions::new("IDatabase")
//!     .with_implementation(Implementation::new(|_| Instance::new(Database {
//!         connection_string: "postgres://localhost".to_string(),
//!     }))));
//! container.register_singleton(None, RegisterOptions::new("IUserService")
//!     .with_implementation(
//!         Implementation::new(|args| Instance::new(UserService {
//!             db: args[0].downcast::<Database>().unwrap(),
//!         }))
//!         .with_constructor_arguments([Some("IDatabase".to_string())]),
//!     ));
//!
//! // Resolve
//! let users = container.get("IUserService").unwrap();
//! let users = users.downcast::<UserService>().unwrap();
//! assert_eq!(users.db.connection_string, "postgres://localhost");
//! ```
//!
//! ## Identifiers, not types
//!
//! Registrations are keyed by caller-chosen strings rather than Rust types.
//! The identifiers usually name interfaces (`"ILogger"`, `"IDatabase"`),
//! and external tooling may attach a constructor-argument list to an
//! implementation under the well-known
//! [`CONSTRUCTOR_ARGUMENTS_IDENTIFIER`] metadata key; the container reads
//! that key at registration time and never inspects the implementation
//! again.
//!
//! ## Dependency cycles
//!
//! When a constructor argument refers back to an ancestor that is still
//! being constructed, the engine injects a deferred [`Instance`] instead of
//! recursing. The handle settles once the whole graph is built; reading it
//! earlier — say, inside the consumer's own constructor body — panics. Keep
//! cyclic reads inside later method calls.
//!
//! ```rust
//! use keyed_di::{DiContainer, Implementation, Instance, RegisterOptions};
//!
//! struct Chicken { egg: Instance }
//! struct Egg { chicken: Instance }
//!
//! let container = DiContainer::new();
//! container.register_singleton(None, RegisterOptions::new("Chicken")
//!     .with_implementation(
//!         Implementation::new(|mut args| Instance::new(Chicken { egg: args.remove(0) }))
//!             .with_constructor_arguments([Some("Egg".to_string())]),
//!     ));
//! container.register_singleton(None, RegisterOptions::new("Egg")
//!     .with_implementation(
//!         Implementation::new(|mut args| Instance::new(Egg { chicken: args.remove(0) }))
//!             .with_constructor_arguments([Some("Chicken".to_string())]),
//!     ));
//!
//! let chicken = container.get("Chicken").unwrap();
//! let chicken = chicken.downcast::<Chicken>().unwrap();
//! // The graph is complete; the deferred handle now settles.
//! let egg = chicken.egg.downcast::<Egg>().unwrap();
//! assert!(egg.chicken.downcast::<Chicken>().is_some());
//! ```

// Module declarations
pub mod container;
pub mod descriptors;
pub mod error;
pub mod instance;
pub mod lifetime;
pub mod metadata;
pub mod observer;

// Internal modules
mod cache;
mod registration;

// Re-export core types
pub use container::DiContainer;
pub use descriptors::{Factory, Implementation, RegisterOptions};
pub use error::{DiError, DiResult};
pub use instance::{Instance, LazyRef};
pub use lifetime::Lifetime;
pub use metadata::{
    ConstructorArgument, ConstructorArgumentList, ServiceIdentifier,
    CONSTRUCTOR_ARGUMENTS_IDENTIFIER,
};
pub use observer::{DiObserver, LoggingObserver};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_singleton_resolution() {
        let container = DiContainer::new();
        container.register_singleton(
            Some(Factory::new(|| Instance::new(42usize))),
            RegisterOptions::new("Answer"),
        );

        let a = container.get("Answer").unwrap();
        let b = container.get("Answer").unwrap();

        assert_eq!(*a.downcast::<usize>().unwrap(), 42);
        assert!(a.ptr_eq(&b)); // Same instance
    }

    #[test]
    fn test_transient_resolution() {
        let container = DiContainer::new();
        container.register_transient(
            Some(Factory::new(|| Instance::new(String::from("fresh")))),
            RegisterOptions::new("Greeting"),
        );

        let a = container.get("Greeting").unwrap();
        let b = container.get("Greeting").unwrap();

        assert_eq!(*a.downcast::<String>().unwrap(), "fresh");
        assert!(!a.ptr_eq(&b)); // Different instances
    }

    #[test]
    fn test_has_is_registry_membership_only() {
        let container = DiContainer::new();
        assert!(!container.has("ICache"));

        container.register_singleton(None, RegisterOptions::new("ICache"));
        // Registered, never resolvable, still a member.
        assert!(container.has("ICache"));
    }

    #[test]
    fn test_unregistered_identifier_errors() {
        let container = DiContainer::new();
        match container.get("IMissing") {
            Err(DiError::NotRegistered { identifier }) => assert_eq!(identifier, "IMissing"),
            other => panic!("expected NotRegistered, got {:?}", other.map(|_| ())),
        }
    }
}
