use exdetail_internals::{Reflect, TypeInfo};

use crate::{
    bag::PropertiesBag,
    destructurer::{DestructureScope, Destructurer},
    detail::{Detail, FALLBACK_TYPE_KEY, TYPE_KEY},
    error::BagError,
    exceptions::Exception,
};

use super::extract_base_fields;

/// Destructures any exception from its reflected properties.
///
/// Writes the base fields, then every other readable property, walked with
/// the scope's depth limit and cycle detection, and finally the full type
/// name under `Type`, or under `$Type` when the exception has a property
/// named `Type`. A property whose getter fails or panics is written as
/// `threw {Type}: {Message}`.
///
/// The registry falls back to this destructurer for types without a
/// destructurer of their own. It never targets a type itself.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReflectionBasedDestructurer;

impl Destructurer for ReflectionBasedDestructurer {
    fn target_types(&self) -> &[&'static TypeInfo] {
        &[]
    }

    fn destructure(
        &self,
        exception: &dyn Exception,
        bag: &mut PropertiesBag<'_>,
        scope: &mut DestructureScope<'_>,
    ) -> Result<(), BagError> {
        extract_base_fields(exception, bag, scope)?;

        let target: &dyn Reflect = exception;
        let info = scope.reflector().reflection_info(exception.type_info());
        for property in info.non_base_properties() {
            let value = match property.read(target) {
                Ok(value) => scope.destructure_value(value, 1),
                Err(thrown) => {
                    tracing::debug!(
                        type_name = exception.type_info().full_name(),
                        property = property.name(),
                        %thrown,
                        "property getter failed"
                    );
                    Detail::from(thrown.to_string())
                }
            };
            bag.add_property(property.name(), value)?;
        }

        let type_name = exception.type_info().full_name();
        if !bag.contains_key(TYPE_KEY) {
            bag.add_property(TYPE_KEY, type_name)
        } else if !bag.contains_key(FALLBACK_TYPE_KEY) {
            bag.add_property(FALLBACK_TYPE_KEY, type_name)
        } else {
            Ok(())
        }
    }
}
