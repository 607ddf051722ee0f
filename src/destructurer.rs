//! The [`Destructurer`] trait and the context it runs in.

use core::{any::type_name, fmt};

use exdetail_internals::{TypeInfo, Value};

use crate::{
    bag::PropertiesBag,
    detail::{Detail, DetailMap},
    error::BagError,
    exceptions::Exception,
    graph::ObjectGraph,
    reflector::PropertyReflector,
    registry::DestructurerRegistry,
    walk::ValueWalker,
};

/// Writes the properties of some exception types into a bag.
///
/// A destructurer is selected by the exact runtime type of the exception: it
/// handles the types returned by [`target_types`](Self::target_types) and
/// nothing else, not even types derived from them.
///
/// # Examples
///
/// ```
/// use exdetail::{
///     TypeInfo,
///     bag::PropertiesBag,
///     destructurer::{DestructureScope, Destructurer},
///     destructurers::ExceptionDestructurer,
///     error::BagError,
///     exceptions::{Exception, TIMEOUT_EXCEPTION},
/// };
///
/// struct TimeoutDestructurer;
///
/// static TARGETS: [&TypeInfo; 1] = [&TIMEOUT_EXCEPTION];
///
/// impl Destructurer for TimeoutDestructurer {
///     fn target_types(&self) -> &[&'static TypeInfo] {
///         &TARGETS
///     }
///
///     fn destructure(
///         &self,
///         exception: &dyn Exception,
///         bag: &mut PropertiesBag<'_>,
///         scope: &mut DestructureScope<'_>,
///     ) -> Result<(), BagError> {
///         ExceptionDestructurer.destructure(exception, bag, scope)?;
///         bag.add_property("Retryable", true)
///     }
/// }
/// ```
pub trait Destructurer: Send + Sync + 'static {
    /// The exception types handled by this destructurer.
    fn target_types(&self) -> &[&'static TypeInfo];

    /// Writes the properties of `exception` into `bag`.
    ///
    /// # Errors
    ///
    /// Propagates the [`BagError`]s of the bag.
    fn destructure(
        &self,
        exception: &dyn Exception,
        bag: &mut PropertiesBag<'_>,
        scope: &mut DestructureScope<'_>,
    ) -> Result<(), BagError>;

    /// A name identifying the destructurer in diagnostics.
    fn name(&self) -> &'static str {
        type_name::<Self>()
    }
}

impl fmt::Debug for dyn Destructurer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The context of one destructuring call.
///
/// Values destructured through the same scope share one table of visited
/// objects, so shared and cyclic references are emitted as `$id`/`$ref` pairs.
/// The registry's property filter applies to the properties of every object
/// walked, not only to the bag.
/// Exceptions destructured through
/// [`destructure_exception`](Self::destructure_exception) start a call of
/// their own.
pub struct DestructureScope<'a> {
    registry: &'a DestructurerRegistry,
    walker: ValueWalker<'a>,
}

impl<'a> DestructureScope<'a> {
    pub(crate) fn new(registry: &'a DestructurerRegistry, exception: &'a dyn Exception) -> Self {
        let walker = ValueWalker::new(registry.reflector(), registry.max_depth());
        let walker = match registry.filter() {
            Some(filter) => walker.with_filter(filter, exception),
            None => walker,
        };
        Self { registry, walker }
    }

    /// Destructures a nested exception with the destructurer registered for
    /// its type.
    ///
    /// # Errors
    ///
    /// Propagates the [`BagError`]s of the nested call.
    pub fn destructure_exception(
        &self,
        exception: &dyn Exception,
    ) -> Result<Option<DetailMap>, BagError> {
        self.registry.destructure_exception(exception)
    }

    /// Destructures a property value found at nesting `level`. The properties
    /// of the exception being destructured are at level 1.
    pub fn destructure_value(&mut self, value: Value, level: usize) -> Detail {
        self.walker.walk(value, level)
    }

    /// The reflector of the registry.
    #[must_use]
    pub fn reflector(&self) -> &'a PropertyReflector {
        self.walker.reflector()
    }

    /// The configured depth limit.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.walker.max_depth()
    }

    pub(crate) fn into_graph(self) -> ObjectGraph {
        self.walker.into_graph()
    }
}

impl fmt::Debug for DestructureScope<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DestructureScope")
            .field("max_depth", &self.max_depth())
            .finish_non_exhaustive()
    }
}
