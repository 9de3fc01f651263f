//! Finding the requested type among everything the provider can see.
//!
//! A request names a type by a dotted path such as `system.collections.generic.List_1`.
//! The namespace part is compared case-insensitively (the consumer only ever writes
//! lowercase packages), the simple name is compared exactly after arity normalization.

use std::path::PathBuf;

use log::debug;

use crate::{
    model::TypeDefinition,
    naming::convert_generic_tick,
    provider::{TypeHandle, TypeMetadataProvider},
    Result,
};

/// A parsed dotted type path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypePath {
    /// Lowercased namespace, empty for the global namespace
    pub namespace: String,
    /// Simple name with arity already in `Name_N` form
    pub name: String,
}

impl TypePath {
    /// Split a dotted path into namespace and simple name.
    ///
    /// The last segment is the name; all preceding segments form the namespace, which is
    /// lowercased. A path without dots has an empty namespace.
    ///
    /// ## Arguments
    /// * 'path' - The dotted path, e.g. `mypkg.MyClass`
    #[must_use]
    pub fn parse(path: &str) -> Self {
        match path.rsplit_once('.') {
            Some((namespace, name)) => TypePath {
                namespace: namespace.to_lowercase(),
                name: name.to_string(),
            },
            None => TypePath {
                namespace: String::new(),
                name: path.to_string(),
            },
        }
    }

    /// Check whether a provider type is the one this path names.
    ///
    /// ## Arguments
    /// * 'handle' - Candidate type
    pub fn matches<T: TypeHandle>(&self, handle: &T) -> bool {
        let namespace = handle.namespace().unwrap_or_default().to_lowercase();
        namespace == self.namespace && convert_generic_tick(&handle.name()) == self.name.as_str()
    }
}

/// Owns a provider for the duration of one invocation and answers lookups against it.
pub struct LookupDriver<P: TypeMetadataProvider> {
    provider: P,
}

impl<P: TypeMetadataProvider> LookupDriver<P> {
    /// Create a driver around a fresh provider
    ///
    /// ## Arguments
    /// * 'provider' - The provider to query
    pub fn new(provider: P) -> Self {
        LookupDriver { provider }
    }

    /// Access the underlying provider
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Load binaries into the provider, in order.
    ///
    /// ## Arguments
    /// * 'paths' - Binaries to load
    ///
    /// # Errors
    /// Stops at and returns the first load failure.
    pub fn load_binaries(&mut self, paths: &[PathBuf]) -> Result<()> {
        for path in paths {
            debug!("loading {}", path.display());
            self.provider.load_binary(path)?;
        }
        Ok(())
    }

    /// Find the first visible type matching a path.
    ///
    /// Types are scanned in provider order. If two types normalize to the same name, the
    /// first one encountered is returned.
    ///
    /// ## Arguments
    /// * 'path' - The parsed type path
    pub fn find(&self, path: &TypePath) -> Option<P::Handle> {
        let candidates = self.provider.visible_types();
        debug!(
            "searching {} visible types for '{}' in namespace '{}'",
            candidates.len(),
            path.name,
            path.namespace
        );

        candidates.into_iter().find(|candidate| path.matches(candidate))
    }

    /// Resolve a dotted path and describe the type it names.
    ///
    /// Returns `Ok(None)` if no visible type matches.
    ///
    /// ## Arguments
    /// * 'path' - The dotted path, e.g. `mypkg.MyClass`
    ///
    /// # Errors
    /// Propagates provider failures raised while describing the found type.
    pub fn lookup(&self, path: &str) -> Result<Option<TypeDefinition>> {
        match self.find(&TypePath::parse(path)) {
            Some(handle) => TypeDefinition::from_handle(&handle).map(Some),
            None => Ok(None),
        }
    }
}
