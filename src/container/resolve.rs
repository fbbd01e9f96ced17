//! The recursive resolution engine.
//!
//! Given an identifier and the chain of ancestors currently under
//! construction, the engine looks up the registration record, short-circuits
//! through the singleton cache, resolves constructor arguments (recursing
//! for unseen dependencies, substituting lazy back-references for ancestors
//! already on the chain), and invokes the construction source.

use smallvec::SmallVec;

use crate::error::{DiError, DiResult};
use crate::instance::{Instance, LazyRef};
use crate::lifetime::Lifetime;
use crate::metadata::ServiceIdentifier;
use crate::registration::Source;

use super::DiContainer;

/// One ancestor of the service currently being constructed.
///
/// The lazy back-reference is bound before the ancestor's construction
/// finishes, so descendants that loop back to it can be handed a forwarding
/// handle instead of recursing forever.
#[derive(Clone)]
pub(crate) struct Parent {
    identifier: ServiceIdentifier,
    lazy: LazyRef,
}

// Ancestor chains are shallow in practice; keep short ones off the heap.
type ChainBuf = SmallVec<[Parent; 4]>;

impl DiContainer {
    /// Constructs a new instance of the given identifier and returns it.
    ///
    /// Yields `Ok(None)` when the identifier has no registration record;
    /// the outermost caller turns that into [`DiError::NotRegistered`],
    /// while recursive callers raise [`DiError::MissingDependency`] naming
    /// their own chain.
    pub(crate) fn construct_instance(
        &self,
        identifier: &str,
        parent_chain: &[Parent],
    ) -> DiResult<Option<Instance>> {
        self.observe(identifier, || self.construct_instance_impl(identifier, parent_chain))
    }

    fn construct_instance_impl(
        &self,
        identifier: &str,
        parent_chain: &[Parent],
    ) -> DiResult<Option<Instance>> {
        let Some(registration) = self.registration(identifier) else {
            return Ok(None);
        };

        // If an instance already exists (and it is a singleton), return that
        // one without re-validating its dependencies.
        if registration.lifetime == Lifetime::Singleton {
            if let Some(existing) = self.instances.get(identifier) {
                return Ok(Some(existing));
            }
        }

        // Bind the back-reference before construction starts, so cyclic
        // dependents can hold a handle to an instance that does not exist
        // yet.
        let me = Parent {
            identifier: identifier.to_owned(),
            lazy: LazyRef::new(),
        };

        let instance = match &registration.source {
            Some(Source::Constructor(construct)) => {
                let arguments = self.arguments_for(identifier);

                let mut chain: ChainBuf = parent_chain.iter().cloned().collect();
                chain.push(me.clone());

                // Instantiate the argument services, re-using singletons and
                // substituting back-references for ancestors on the chain.
                let mut resolved = Vec::with_capacity(arguments.len());
                for argument in &arguments {
                    let Some(dependency) = argument else {
                        resolved.push(Instance::unset());
                        continue;
                    };

                    if let Some(ancestor) =
                        parent_chain.iter().find(|parent| parent.identifier == *dependency)
                    {
                        resolved.push(Instance::deferred(ancestor.lazy.clone()));
                        continue;
                    }

                    match self.construct_instance(dependency, &chain)? {
                        Some(built) => resolved.push(built),
                        None => {
                            return Err(DiError::MissingDependency {
                                dependency: dependency.clone(),
                                chain: identifiers_of(&chain),
                            })
                        }
                    }
                }

                construct(resolved)
            }
            Some(Source::Factory(factory)) => factory.invoke(),
            None => {
                let mut chain: Vec<ServiceIdentifier> = identifiers_of(parent_chain);
                chain.push(me.identifier);
                return Err(DiError::NoImplementation {
                    identifier: identifier.to_owned(),
                    chain,
                });
            }
        };

        // The slot must be filled before the instance escapes, so cyclic
        // consumers created above settle correctly once they read.
        me.lazy.fill(instance.clone());

        Ok(Some(if registration.lifetime == Lifetime::Singleton {
            self.instances.set(identifier, instance)
        } else {
            instance
        }))
    }
}

fn identifiers_of(chain: &[Parent]) -> Vec<ServiceIdentifier> {
    chain.iter().map(|parent| parent.identifier.clone()).collect()
}
