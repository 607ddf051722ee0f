use std::borrow::Cow;

use exdetail_internals::{Obj, PropertyDecl, Reflect, Thrown, TypeInfo, Value};

use super::{ExceptionCore, ExceptionRef, SYSTEM_EXCEPTION, SystemException};
use crate::objects::{List, TypeHandle};

static REFLECTION_TYPE_LOAD_EXCEPTION_PROPERTIES: [PropertyDecl; 2] = [
    PropertyDecl::new("Types", types),
    PropertyDecl::new("LoaderExceptions", loader_exceptions),
];

/// Type descriptor of [`ReflectionTypeLoadException`].
pub static REFLECTION_TYPE_LOAD_EXCEPTION: TypeInfo =
    TypeInfo::new::<ReflectionTypeLoadException>(
        "ReflectionTypeLoadException",
        concat!(module_path!(), "::ReflectionTypeLoadException"),
    )
    .extends(&SYSTEM_EXCEPTION)
    .with_properties(&REFLECTION_TYPE_LOAD_EXCEPTION_PROPERTIES);

fn types(this: &dyn Reflect) -> Result<Value, Thrown> {
    let this = this.part::<ReflectionTypeLoadException>()?;
    Ok(Value::object(
        this.types
            .iter()
            .map(|ty| ty.map_or(Value::Null, Value::object))
            .collect::<List>(),
    ))
}

fn loader_exceptions(this: &dyn Reflect) -> Result<Value, Thrown> {
    let this = this.part::<ReflectionTypeLoadException>()?;
    Ok(Value::object(
        this.loader_exceptions
            .iter()
            .map(|exception| match exception {
                Some(exception) => {
                    let exception: Obj = exception.clone();
                    Value::Object(exception)
                }
                None => Value::Null,
            })
            .collect::<List>(),
    ))
}

/// Some of the types of a module could not be loaded.
///
/// `types` has one entry per type of the module, `None` for the ones that
/// failed to load; `loader_exceptions` has one entry per failure.
pub struct ReflectionTypeLoadException {
    base: SystemException,
    types: Vec<Option<TypeHandle>>,
    loader_exceptions: Vec<Option<ExceptionRef>>,
}

impl ReflectionTypeLoadException {
    /// The message used when none is given.
    pub const DEFAULT_MESSAGE: &'static str =
        "Unable to load one or more of the requested types.";

    /// Creates the exception with the default message.
    #[must_use]
    pub fn new(
        types: impl IntoIterator<Item = Option<TypeHandle>>,
        loader_exceptions: impl IntoIterator<Item = Option<ExceptionRef>>,
    ) -> Self {
        Self::with_message(Self::DEFAULT_MESSAGE, types, loader_exceptions)
    }

    /// Creates the exception with the given message.
    #[must_use]
    pub fn with_message(
        message: impl Into<Cow<'static, str>>,
        types: impl IntoIterator<Item = Option<TypeHandle>>,
        loader_exceptions: impl IntoIterator<Item = Option<ExceptionRef>>,
    ) -> Self {
        Self {
            base: SystemException::from(ExceptionCore::new(message)),
            types: types.into_iter().collect(),
            loader_exceptions: loader_exceptions.into_iter().collect(),
        }
    }

    /// The types of the module, `None` for the ones that failed to load.
    #[must_use]
    pub fn types(&self) -> &[Option<TypeHandle>] {
        &self.types
    }

    /// The failures raised while loading.
    #[must_use]
    pub fn loader_exceptions(&self) -> &[Option<ExceptionRef>] {
        &self.loader_exceptions
    }
}

impl From<ExceptionCore> for ReflectionTypeLoadException {
    fn from(core: ExceptionCore) -> Self {
        Self {
            base: SystemException::from(core),
            types: Vec::new(),
            loader_exceptions: Vec::new(),
        }
    }
}

crate::__impl_exception!(ReflectionTypeLoadException, REFLECTION_TYPE_LOAD_EXCEPTION);
