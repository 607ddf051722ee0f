use core::{any::Any, fmt};

use exdetail_internals::{Reflect, Shape, TypeInfo, Value};

/// Type descriptor of [`DeferredQuery`].
pub static DEFERRED_QUERY: TypeInfo =
    TypeInfo::new::<DeferredQuery>("DeferredQuery", concat!(module_path!(), "::DeferredQuery"));

type Source = Box<dyn Fn() -> Vec<Value> + Send + Sync>;

/// A lazily evaluated query.
///
/// Evaluating a query may hit a database or a remote service, so the engine
/// never does it: a deferred query is always logged as a fixed marker.
pub struct DeferredQuery {
    source: Source,
}

impl DeferredQuery {
    /// Wraps the function producing the query's results.
    #[must_use]
    pub fn new(source: impl Fn() -> Vec<Value> + Send + Sync + 'static) -> Self {
        Self {
            source: Box::new(source),
        }
    }

    /// Runs the query.
    #[must_use]
    pub fn evaluate(&self) -> Vec<Value> {
        (self.source)()
    }
}

impl fmt::Debug for DeferredQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredQuery").finish_non_exhaustive()
    }
}

impl Reflect for DeferredQuery {
    fn type_info(&self) -> &'static TypeInfo {
        &DEFERRED_QUERY
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn shape(&self) -> Shape<'_> {
        Shape::Deferred
    }
}
