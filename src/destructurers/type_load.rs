use exdetail_internals::TypeInfo;

use super::ExceptionDestructurer;
use crate::{
    bag::PropertiesBag,
    destructurer::{DestructureScope, Destructurer},
    detail::Detail,
    error::BagError,
    exceptions::{Exception, REFLECTION_TYPE_LOAD_EXCEPTION, ReflectionTypeLoadException},
};

static TARGETS: [&TypeInfo; 1] = [&REFLECTION_TYPE_LOAD_EXCEPTION];

/// Adds `Types`, the full names of the module's types, and, when there are
/// any, `LoaderExceptions`, each destructured with its own destructurer.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReflectionTypeLoadExceptionDestructurer;

impl Destructurer for ReflectionTypeLoadExceptionDestructurer {
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
        let Ok(type_load) = exception.part::<ReflectionTypeLoadException>() else {
            return Ok(());
        };

        let types: Vec<_> = type_load
            .types()
            .iter()
            .map(|ty| Detail::from(ty.map(|ty| ty.type_info_of().full_name())))
            .collect();
        bag.add_property("Types", types)?;

        if !type_load.loader_exceptions().is_empty() {
            let mut loader_exceptions = Vec::with_capacity(type_load.loader_exceptions().len());
            for loader_exception in type_load.loader_exceptions() {
                let detail = match loader_exception {
                    Some(loader_exception) => scope.destructure_exception(&**loader_exception)?,
                    None => None,
                };
                loader_exceptions.push(Detail::from(detail));
            }
            bag.add_property("LoaderExceptions", loader_exceptions)?;
        }
        Ok(())
    }
}
