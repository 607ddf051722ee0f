use exdetail_internals::TypeInfo;

use super::ExceptionDestructurer;
use crate::{
    bag::PropertiesBag,
    destructurer::{DestructureScope, Destructurer},
    error::BagError,
    exceptions::{
        ARGUMENT_EXCEPTION, ARGUMENT_NULL_EXCEPTION, ARGUMENT_OUT_OF_RANGE_EXCEPTION,
        ArgumentException, ArgumentOutOfRangeException, Exception,
    },
};

static ARGUMENT_TARGETS: [&TypeInfo; 2] = [&ARGUMENT_EXCEPTION, &ARGUMENT_NULL_EXCEPTION];

/// Adds `ParamName` to the base fields.
#[derive(Clone, Copy, Debug, Default)]
pub struct ArgumentExceptionDestructurer;

impl Destructurer for ArgumentExceptionDestructurer {
    fn target_types(&self) -> &[&'static TypeInfo] {
        &ARGUMENT_TARGETS
    }

    fn destructure(
        &self,
        exception: &dyn Exception,
        bag: &mut PropertiesBag<'_>,
        scope: &mut DestructureScope<'_>,
    ) -> Result<(), BagError> {
        ExceptionDestructurer.destructure(exception, bag, scope)?;
        if let Ok(argument) = exception.part::<ArgumentException>() {
            bag.add_property("ParamName", argument.param_name())?;
        }
        Ok(())
    }
}

static ARGUMENT_OUT_OF_RANGE_TARGETS: [&TypeInfo; 1] = [&ARGUMENT_OUT_OF_RANGE_EXCEPTION];

/// Adds `ParamName` and the walked `ActualValue` to the base fields.
#[derive(Clone, Copy, Debug, Default)]
pub struct ArgumentOutOfRangeExceptionDestructurer;

impl Destructurer for ArgumentOutOfRangeExceptionDestructurer {
    fn target_types(&self) -> &[&'static TypeInfo] {
        &ARGUMENT_OUT_OF_RANGE_TARGETS
    }

    fn destructure(
        &self,
        exception: &dyn Exception,
        bag: &mut PropertiesBag<'_>,
        scope: &mut DestructureScope<'_>,
    ) -> Result<(), BagError> {
        ArgumentExceptionDestructurer.destructure(exception, bag, scope)?;
        if let Ok(out_of_range) = exception.part::<ArgumentOutOfRangeException>() {
            let actual_value = scope.destructure_value(out_of_range.actual_value().clone(), 1);
            bag.add_property("ActualValue", actual_value)?;
        }
        Ok(())
    }
}
