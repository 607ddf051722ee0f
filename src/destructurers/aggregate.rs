use exdetail_internals::TypeInfo;

use super::ExceptionDestructurer;
use crate::{
    bag::PropertiesBag,
    destructurer::{DestructureScope, Destructurer},
    detail::Detail,
    error::BagError,
    exceptions::{AGGREGATE_EXCEPTION, AggregateException, Exception},
};

static TARGETS: [&TypeInfo; 1] = [&AGGREGATE_EXCEPTION];

/// Adds `InnerExceptions`, each destructured with its own destructurer, in
/// their original order.
#[derive(Clone, Copy, Debug, Default)]
pub struct AggregateExceptionDestructurer;

impl Destructurer for AggregateExceptionDestructurer {
    fn target_types(&self) -> &[&'static TypeInfo] {
        &TARGETS
    }

    fn destructure(
        &self,
        exception: &dyn Exception,
        bag: &mut PropertiesBag<'_>,
        scope: &mut DestructureScope<'_>,
    ) -> Result<(), BagError> {
        ExceptionDestructurer.destructure(exception, bag, scope)?;
        let Ok(aggregate) = exception.part::<AggregateException>() else {
            return Ok(());
        };

        let mut inner_exceptions = Vec::with_capacity(aggregate.inner_exceptions().len());
        for inner in aggregate.inner_exceptions() {
            inner_exceptions.push(Detail::from(scope.destructure_exception(&**inner)?));
        }
        bag.add_property("InnerExceptions", inner_exceptions)
    }
}
