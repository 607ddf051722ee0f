//! Selection of the destructurer for an exception.

use core::{any::TypeId, fmt};
use std::sync::Arc;

use hashbrown::{HashMap, hash_map::Entry};
use rustc_hash::FxBuildHasher;

use crate::{
    bag::PropertiesBag,
    destructurer::{DestructureScope, Destructurer},
    destructurers::ReflectionBasedDestructurer,
    detail::DetailMap,
    error::{BagError, ConfigError},
    exceptions::Exception,
    filters::PropertyFilter,
    options::DestructuringOptions,
    reflector::PropertyReflector,
};

type DestructurerMap = HashMap<TypeId, Arc<dyn Destructurer>, FxBuildHasher>;

/// Maps every targeted exception type to its destructurer.
///
/// # Errors
///
/// Returns [`ConfigError::DuplicateDestructurer`] if two destructurers target
/// the same type.
pub(crate) fn index_destructurers(
    destructurers: &[Arc<dyn Destructurer>],
) -> Result<DestructurerMap, ConfigError> {
    let mut index = DestructurerMap::default();
    for destructurer in destructurers {
        for ty in destructurer.target_types() {
            match index.entry(ty.type_id()) {
                Entry::Occupied(existing) => {
                    return Err(ConfigError::DuplicateDestructurer {
                        type_name: ty.full_name(),
                        first: existing.get().name(),
                        second: destructurer.name(),
                    });
                }
                Entry::Vacant(slot) => {
                    slot.insert(destructurer.clone());
                }
            }
        }
    }
    Ok(index)
}

/// Destructures exceptions with the destructurer registered for their exact
/// runtime type, falling back to the [`ReflectionBasedDestructurer`] unless it
/// is disabled.
pub struct DestructurerRegistry {
    destructurers: DestructurerMap,
    fallback: Option<ReflectionBasedDestructurer>,
    reflector: Arc<PropertyReflector>,
    filter: Option<Arc<dyn PropertyFilter>>,
    max_depth: usize,
}

impl DestructurerRegistry {
    /// Creates a registry with a reflector of its own.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DuplicateDestructurer`] if two destructurers
    /// target the same type.
    pub fn new(options: &DestructuringOptions) -> Result<Self, ConfigError> {
        Self::with_reflector(options, Arc::new(PropertyReflector::new()))
    }

    /// Creates a registry sharing `reflector`, and its cache, with others.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DuplicateDestructurer`] if two destructurers
    /// target the same type.
    pub fn with_reflector(
        options: &DestructuringOptions,
        reflector: Arc<PropertyReflector>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            destructurers: index_destructurers(options.destructurers())?,
            fallback: options
                .is_reflection_based_destructurer_enabled()
                .then_some(ReflectionBasedDestructurer),
            reflector,
            filter: options.filter().cloned(),
            max_depth: options.depth(),
        })
    }

    /// Destructures `exception` into a fresh map.
    ///
    /// Returns `Ok(None)` when no destructurer handles the exception's type
    /// and the reflection-based fallback is disabled.
    ///
    /// # Errors
    ///
    /// Propagates the [`BagError`]s raised by the destructurer.
    pub fn destructure_exception(
        &self,
        exception: &dyn Exception,
    ) -> Result<Option<DetailMap>, BagError> {
        let type_info = exception.type_info();
        let destructurer: &dyn Destructurer = match self.destructurers.get(&type_info.type_id()) {
            Some(destructurer) => &**destructurer,
            None => match &self.fallback {
                Some(fallback) => {
                    tracing::trace!(
                        type_name = type_info.full_name(),
                        "no destructurer registered, reflecting properties"
                    );
                    fallback
                }
                None => {
                    tracing::trace!(
                        type_name = type_info.full_name(),
                        "no destructurer registered and reflection disabled"
                    );
                    return Ok(None);
                }
            },
        };

        let mut bag = PropertiesBag::new(exception, self.filter.as_deref());
        let mut scope = DestructureScope::new(self, exception);
        destructurer.destructure(exception, &mut bag, &mut scope)?;

        let graph = scope.into_graph();
        bag.resolve_anchors(&|anchor| graph.id_of(anchor));
        Ok(Some(bag.into_properties()))
    }

    /// The destructurer registered for exactly `type_id`.
    #[must_use]
    pub fn destructurer_for(&self, type_id: TypeId) -> Option<&dyn Destructurer> {
        self.destructurers.get(&type_id).map(|destructurer| &**destructurer)
    }

    /// The reflector used by every call.
    #[must_use]
    pub fn reflector(&self) -> &Arc<PropertyReflector> {
        &self.reflector
    }

    pub(crate) fn filter(&self) -> Option<&dyn PropertyFilter> {
        self.filter.as_deref()
    }

    /// The depth limit of every call.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

impl fmt::Debug for DestructurerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DestructurerRegistry")
            .field("destructurers", &self.destructurers.len())
            .field("fallback", &self.fallback.is_some())
            .field("max_depth", &self.max_depth)
            .finish_non_exhaustive()
    }
}
