//! Service registration types.

use std::collections::HashMap;

use crate::descriptors::{ConstructFn, Factory};
use crate::lifetime::Lifetime;
use crate::metadata::ServiceIdentifier;

/// The construction source a registration resolved to at registration time.
///
/// Which branch applies is decided when the service is registered, not by a
/// structural test at resolution time.
#[derive(Clone)]
pub(crate) enum Source {
    /// Zero-argument factory; owns its construction entirely.
    Factory(Factory),
    /// Positional constructor; fed from the constructor-argument list.
    Constructor(ConstructFn),
}

/// Service registration with lifetime and construction source
///
/// A registration may carry no source at all; that is legal until the
/// identifier is first resolved.
#[derive(Clone)]
pub(crate) struct Registration {
    pub(crate) lifetime: Lifetime,
    pub(crate) source: Option<Source>,
}

impl Registration {
    pub(crate) fn new(lifetime: Lifetime, source: Option<Source>) -> Self {
        Self { lifetime, source }
    }
}

/// Service registry holding all registrations
pub(crate) struct Registry {
    /// Fast Vec lookup for first N registrations (cache-friendly)
    one_small: Vec<(ServiceIdentifier, Registration)>,
    /// HashMap fallback for remaining registrations
    one_large: HashMap<ServiceIdentifier, Registration>,
    /// Threshold for Vec vs HashMap (optimize for small collections)
    small_threshold: usize,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self {
            one_small: Vec::new(),
            one_large: HashMap::new(),
            small_threshold: 16,
        }
    }

    /// Inserts a registration, replacing any earlier one for the identifier.
    pub(crate) fn insert(&mut self, identifier: ServiceIdentifier, registration: Registration) {
        if let Some(pos) = self.one_small.iter().position(|(id, _)| *id == identifier) {
            self.one_small[pos] = (identifier, registration);
        } else if self.one_large.contains_key(&identifier) {
            self.one_large.insert(identifier, registration);
        } else if self.one_small.len() < self.small_threshold {
            self.one_small.push((identifier, registration));
        } else {
            self.one_large.insert(identifier, registration);
        }
    }

    /// Gets a registration with optimal lookup
    #[inline(always)]
    pub(crate) fn get(&self, identifier: &str) -> Option<&Registration> {
        // Fast path: linear search through Vec (cache-friendly for small collections)
        for (id, registration) in &self.one_small {
            if id == identifier {
                return Some(registration);
            }
        }

        // Fallback: HashMap lookup
        self.one_large.get(identifier)
    }

    /// Checks if an identifier exists in the registry
    #[inline(always)]
    pub(crate) fn contains_key(&self, identifier: &str) -> bool {
        self.one_small.iter().any(|(id, _)| id == identifier)
            || self.one_large.contains_key(identifier)
    }
}
