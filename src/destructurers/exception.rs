use exdetail_internals::{MapView, Obj, TypeInfo, Value};

use crate::{
    bag::PropertiesBag,
    destructurer::{DestructureScope, Destructurer},
    detail::TYPE_KEY,
    error::BagError,
    exceptions::{
        ARITHMETIC_EXCEPTION, DIVIDE_BY_ZERO_EXCEPTION, EXCEPTION, Exception, FORMAT_EXCEPTION,
        INVALID_OPERATION_EXCEPTION, NOT_IMPLEMENTED_EXCEPTION, NOT_SUPPORTED_EXCEPTION,
        SYSTEM_EXCEPTION, TIMEOUT_EXCEPTION,
    },
};

/// Writes the fields every exception carries, in this order:
///
/// | property | written |
/// |----------|---------|
/// | `Data` | if the dictionary is not empty, destructured |
/// | `HelpLink` | if set and not empty |
/// | `HResult` | if not zero |
/// | `Message` | always |
/// | `Source` | always, possibly null |
/// | `StackTrace` | always, possibly null |
/// | `InnerException` | if set, with its own destructurer |
///
/// # Errors
///
/// Propagates the [`BagError`]s of the bag and of the nested call.
pub fn extract_base_fields(
    exception: &dyn Exception,
    bag: &mut PropertiesBag<'_>,
    scope: &mut DestructureScope<'_>,
) -> Result<(), BagError> {
    let core = exception.core();

    if !core.data().is_empty() {
        let data: Obj = core.data().clone();
        let data = scope.destructure_value(Value::Object(data), 1);
        bag.add_property("Data", data)?;
    }
    if let Some(help_link) = core.help_link().filter(|help_link| !help_link.is_empty()) {
        bag.add_property("HelpLink", help_link)?;
    }
    if core.hresult() != 0 {
        bag.add_property("HResult", core.hresult())?;
    }
    bag.add_property("Message", core.message())?;
    bag.add_property("Source", core.source())?;
    bag.add_property("StackTrace", core.stack_trace())?;
    if let Some(inner) = core.inner_exception() {
        let inner = scope.destructure_exception(&**inner)?;
        bag.add_property("InnerException", inner)?;
    }
    Ok(())
}

static TARGETS: [&TypeInfo; 9] = [
    &EXCEPTION,
    &SYSTEM_EXCEPTION,
    &INVALID_OPERATION_EXCEPTION,
    &NOT_SUPPORTED_EXCEPTION,
    &NOT_IMPLEMENTED_EXCEPTION,
    &FORMAT_EXCEPTION,
    &TIMEOUT_EXCEPTION,
    &ARITHMETIC_EXCEPTION,
    &DIVIDE_BY_ZERO_EXCEPTION,
];

/// Destructures the root exception type and the system exceptions without
/// properties of their own: `Type` followed by the base fields.
///
/// The other built-in destructurers run this one first.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExceptionDestructurer;

impl Destructurer for ExceptionDestructurer {
    fn target_types(&self) -> &[&'static TypeInfo] {
        &TARGETS
    }

    fn destructure(
        &self,
        exception: &dyn Exception,
        bag: &mut PropertiesBag<'_>,
        scope: &mut DestructureScope<'_>,
    ) -> Result<(), BagError> {
        bag.add_property(TYPE_KEY, exception.type_info().full_name())?;
        extract_base_fields(exception, bag, scope)
    }
}
