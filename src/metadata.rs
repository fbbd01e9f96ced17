//! Metadata contract shared with external registration tooling.
//!
//! A registered implementation may carry, under one well-known key, the
//! ordered list of service identifiers its constructor parameters should be
//! resolved against. The list is usually attached by an external source
//! rewriter, but hand-written lists are equally valid; the container only
//! reads the key and never cares how the list was produced.

/// Opaque, caller-chosen key under which a service is registered.
///
/// Identifiers are plain strings; the container attaches no meaning to them
/// beyond uniqueness. Registering the same identifier twice silently
/// replaces the earlier registration.
pub type ServiceIdentifier = String;

/// One constructor parameter position.
///
/// `Some(identifier)` asks the container to resolve that identifier and
/// inject the result; `None` marks the position as "do not inject" — the
/// constructor receives an unset instance and satisfies the parameter some
/// other way.
pub type ConstructorArgument = Option<ServiceIdentifier>;

/// Ordered constructor-argument list, one entry per parameter position.
pub type ConstructorArgumentList = Vec<ConstructorArgument>;

/// Well-known metadata key for the constructor-argument list.
///
/// When an [`Implementation`](crate::Implementation) carries metadata under
/// this key, registration copies the value (a [`ConstructorArgumentList`])
/// into the container. This key is the sole interface surface shared with
/// external tooling.
pub const CONSTRUCTOR_ARGUMENTS_IDENTIFIER: &str = "___CTOR_ARGS___";
