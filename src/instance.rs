//! Type-erased instance handles and lazy back-references.

use std::any::Any;
use std::sync::Arc;

use once_cell::sync::OnceCell;

// Type-erased Arc for storage
pub(crate) type AnyArc = Arc<dyn Any + Send + Sync>;

/// A cheap, clonable handle to a constructed service instance.
///
/// The container stores and passes service objects through this handle so
/// that heterogeneous graphs can flow through one resolution engine. A
/// handle is in one of three states:
///
/// - **ready** — it holds a constructed value, recoverable with
///   [`downcast`](Instance::downcast);
/// - **unset** — it holds nothing. Factories may return unset, and skipped
///   constructor positions receive unset. Resolution treats unset as a
///   perfectly valid outcome, not an error;
/// - **deferred** — it forwards to an ancestor service that is still under
///   construction (see [`LazyRef`]). Reads settle against the ancestor's
///   slot once that construction has completed.
///
/// Cloning an `Instance` clones the handle, never the underlying value, so
/// reference equality ([`ptr_eq`](Instance::ptr_eq)) is preserved across
/// clones.
///
/// # Examples
///
/// ```rust
/// use keyed_di::Instance;
///
/// struct Config { port: u16 }
///
/// let instance = Instance::new(Config { port: 8080 });
/// let config = instance.downcast::<Config>().unwrap();
/// assert_eq!(config.port, 8080);
///
/// let nothing = Instance::unset();
/// assert!(nothing.is_unset());
/// assert!(nothing.downcast::<Config>().is_none());
/// ```
#[derive(Clone)]
pub struct Instance {
    repr: Repr,
}

#[derive(Clone)]
enum Repr {
    Unset,
    Ready(AnyArc),
    Deferred(LazyRef),
}

impl Instance {
    /// Wraps a value into a ready instance handle.
    pub fn new<T: Send + Sync + 'static>(value: T) -> Self {
        Self::from_arc(Arc::new(value))
    }

    /// Wraps an already shared value into a ready instance handle.
    pub fn from_arc<T: Send + Sync + 'static>(value: Arc<T>) -> Self {
        Instance { repr: Repr::Ready(value) }
    }

    /// Creates a handle holding nothing.
    ///
    /// The analog of an absent value in the original object model: it
    /// resolves, caches as "not present", and injects without error.
    pub fn unset() -> Self {
        Instance { repr: Repr::Unset }
    }

    /// Creates a handle forwarding to a not-yet-filled construction slot.
    pub(crate) fn deferred(slot: LazyRef) -> Self {
        Instance { repr: Repr::Deferred(slot) }
    }

    /// Returns true if this handle is a deferred back-reference.
    ///
    /// Deferred handles are what cyclic constructor positions receive; a
    /// consumer can use this to decide to stash the handle for later
    /// instead of reading it immediately.
    pub fn is_deferred(&self) -> bool {
        matches!(self.repr, Repr::Deferred(_))
    }

    /// Returns true if this handle holds nothing.
    ///
    /// # Panics
    ///
    /// Panics on a deferred handle whose ancestor has not finished
    /// constructing (see [`LazyRef::get`]).
    pub fn is_unset(&self) -> bool {
        matches!(self.settled().repr, Repr::Unset)
    }

    /// Recovers the typed value behind this handle.
    ///
    /// Returns `None` when the handle is unset or holds a value of a
    /// different type.
    ///
    /// # Panics
    ///
    /// Panics on a deferred handle whose ancestor has not finished
    /// constructing (see [`LazyRef::get`]).
    pub fn downcast<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        match self.settled().repr {
            Repr::Ready(value) => value.downcast::<T>().ok(),
            _ => None,
        }
    }

    /// Reference equality between two handles.
    ///
    /// Two ready handles compare equal when they share one allocation; two
    /// unset handles compare equal. Deferred handles settle first.
    pub fn ptr_eq(&self, other: &Instance) -> bool {
        match (&self.settled().repr, &other.settled().repr) {
            (Repr::Ready(a), Repr::Ready(b)) => Arc::ptr_eq(a, b),
            (Repr::Unset, Repr::Unset) => true,
            _ => false,
        }
    }

    /// Follows deferred handles to the instance their slot was filled with.
    fn settled(&self) -> Instance {
        let mut current = self.clone();
        while let Repr::Deferred(slot) = &current.repr {
            current = slot.get();
        }
        current
    }
}

impl std::fmt::Debug for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.repr {
            Repr::Unset => f.write_str("Instance::Unset"),
            Repr::Ready(_) => f.write_str("Instance::Ready"),
            Repr::Deferred(slot) if slot.try_get().is_none() => {
                f.write_str("Instance::Deferred(pending)")
            }
            Repr::Deferred(_) => f.write_str("Instance::Deferred(filled)"),
        }
    }
}

/// A lazy back-reference: a forwarding handle to an instance that does not
/// exist yet.
///
/// The resolution engine binds one of these for every service before its
/// construction begins, and fills the slot once construction has finished.
/// Cyclic dependents receive the handle (wrapped as a deferred
/// [`Instance`]) instead of recursing forever.
///
/// The contract is the one the engine's cycle-breaking imposes on
/// consumers: the slot must not be read until the full object graph has
/// finished constructing — typically from a later method call, never from
/// inside the consumer's own constructor body. Whether the slot ends up
/// holding an unset instance (a cyclic ancestor built by a factory that
/// returned nothing) is deliberately unspecified.
#[derive(Clone)]
pub struct LazyRef {
    slot: Arc<OnceCell<Instance>>,
}

impl LazyRef {
    pub(crate) fn new() -> Self {
        LazyRef { slot: Arc::new(OnceCell::new()) }
    }

    /// Fills the slot with the freshly constructed instance.
    ///
    /// Called exactly once per construction; a second fill is ignored.
    pub(crate) fn fill(&self, instance: Instance) {
        let _ = self.slot.set(instance);
    }

    /// Returns the instance the slot was filled with, if construction has
    /// completed.
    pub fn try_get(&self) -> Option<Instance> {
        self.slot.get().cloned()
    }

    /// Returns the instance the slot was filled with.
    ///
    /// # Panics
    ///
    /// Panics if the slot is read before the construction it belongs to
    /// has completed.
    pub fn get(&self) -> Instance {
        match self.slot.get() {
            Some(instance) => instance.clone(),
            None => panic!("lazy service reference read before its construction completed"),
        }
    }
}

impl std::fmt::Debug for LazyRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.try_get() {
            Some(_) => f.write_str("LazyRef(filled)"),
            None => f.write_str("LazyRef(pending)"),
        }
    }
}
