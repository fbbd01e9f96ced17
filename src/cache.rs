//! Singleton instance memoization.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::instance::Instance;
use crate::metadata::ServiceIdentifier;

/// Map from service identifier to a previously constructed singleton.
///
/// Written only for singleton registrations, immediately after a successful
/// construction; partially constructed instances never land here. An entry
/// holding an unset instance reports as absent, so a factory that returned
/// nothing runs again on the next request.
pub(crate) struct InstanceCache {
    inner: Mutex<HashMap<ServiceIdentifier, Instance>>,
}

impl InstanceCache {
    pub(crate) fn new() -> Self {
        Self { inner: Mutex::new(HashMap::new()) }
    }

    /// Returns the cached instance for the identifier, if one is present.
    pub(crate) fn get(&self, identifier: &str) -> Option<Instance> {
        self.inner
            .lock()
            .unwrap()
            .get(identifier)
            .filter(|instance| !instance.is_unset())
            .cloned()
    }

    /// Stores the instance and hands it back.
    pub(crate) fn set(&self, identifier: &str, instance: Instance) -> Instance {
        self.inner
            .lock()
            .unwrap()
            .insert(identifier.to_owned(), instance.clone());
        instance
    }
}
