use std::borrow::Cow;

use exdetail_internals::{PropertyDecl, Reflect, Thrown, TypeInfo, Value};

use super::{ExceptionCore, SYSTEM_EXCEPTION, SystemException};

static ARGUMENT_EXCEPTION_PROPERTIES: [PropertyDecl; 1] =
    [PropertyDecl::new("ParamName", param_name)];

/// Type descriptor of [`ArgumentException`].
pub static ARGUMENT_EXCEPTION: TypeInfo = TypeInfo::new::<ArgumentException>(
    "ArgumentException",
    concat!(module_path!(), "::ArgumentException"),
)
.extends(&SYSTEM_EXCEPTION)
.with_properties(&ARGUMENT_EXCEPTION_PROPERTIES);

/// Type descriptor of [`ArgumentNullException`].
pub static ARGUMENT_NULL_EXCEPTION: TypeInfo = TypeInfo::new::<ArgumentNullException>(
    "ArgumentNullException",
    concat!(module_path!(), "::ArgumentNullException"),
)
.extends(&ARGUMENT_EXCEPTION);

static ARGUMENT_OUT_OF_RANGE_EXCEPTION_PROPERTIES: [PropertyDecl; 1] =
    [PropertyDecl::new("ActualValue", actual_value)];

/// Type descriptor of [`ArgumentOutOfRangeException`].
pub static ARGUMENT_OUT_OF_RANGE_EXCEPTION: TypeInfo =
    TypeInfo::new::<ArgumentOutOfRangeException>(
        "ArgumentOutOfRangeException",
        concat!(module_path!(), "::ArgumentOutOfRangeException"),
    )
    .extends(&ARGUMENT_EXCEPTION)
    .with_properties(&ARGUMENT_OUT_OF_RANGE_EXCEPTION_PROPERTIES);

fn param_name(this: &dyn Reflect) -> Result<Value, Thrown> {
    Ok(this.part::<ArgumentException>()?.param_name.clone().into())
}

fn actual_value(this: &dyn Reflect) -> Result<Value, Thrown> {
    Ok(this
        .part::<ArgumentOutOfRangeException>()?
        .actual_value
        .clone())
}

/// One of the arguments provided to a method is not valid.
///
/// # Examples
///
/// ```
/// use exdetail::exceptions::ArgumentException;
///
/// let exception = ArgumentException::new("must not be blank").with_param_name("user");
/// assert_eq!(exception.param_name(), Some("user"));
/// ```
pub struct ArgumentException {
    base: SystemException,
    param_name: Option<Cow<'static, str>>,
}

impl ArgumentException {
    /// Creates the exception with the given message.
    #[must_use]
    pub fn new(message: impl Into<Cow<'static, str>>) -> Self {
        Self::from(ExceptionCore::new(message))
    }

    /// Sets the name of the offending parameter.
    #[must_use]
    pub fn with_param_name(mut self, param_name: impl Into<Cow<'static, str>>) -> Self {
        self.param_name = Some(param_name.into());
        self
    }

    /// The name of the offending parameter.
    #[must_use]
    pub fn param_name(&self) -> Option<&str> {
        self.param_name.as_deref()
    }
}

impl From<ExceptionCore> for ArgumentException {
    fn from(core: ExceptionCore) -> Self {
        Self {
            base: SystemException::from(core),
            param_name: None,
        }
    }
}

crate::__impl_exception!(ArgumentException, ARGUMENT_EXCEPTION);

/// A required argument was missing.
pub struct ArgumentNullException {
    base: ArgumentException,
}

impl ArgumentNullException {
    /// The message used when none is given.
    pub const DEFAULT_MESSAGE: &'static str = "Value cannot be null.";

    /// Creates the exception for the missing parameter `param_name`.
    #[must_use]
    pub fn new(param_name: impl Into<Cow<'static, str>>) -> Self {
        Self::from(ExceptionCore::new(Self::DEFAULT_MESSAGE)).with_param_name(param_name)
    }

    /// Sets the name of the offending parameter.
    #[must_use]
    pub fn with_param_name(mut self, param_name: impl Into<Cow<'static, str>>) -> Self {
        self.base = self.base.with_param_name(param_name);
        self
    }

    /// The name of the offending parameter.
    #[must_use]
    pub fn param_name(&self) -> Option<&str> {
        self.base.param_name()
    }
}

impl From<ExceptionCore> for ArgumentNullException {
    fn from(core: ExceptionCore) -> Self {
        Self {
            base: ArgumentException::from(core),
        }
    }
}

crate::__impl_exception!(ArgumentNullException, ARGUMENT_NULL_EXCEPTION);

/// An argument is outside the range of allowed values.
pub struct ArgumentOutOfRangeException {
    base: ArgumentException,
    actual_value: Value,
}

impl ArgumentOutOfRangeException {
    /// The message used when none is given.
    pub const DEFAULT_MESSAGE: &'static str =
        "Specified argument was out of the range of valid values.";

    /// Creates the exception for the parameter `param_name`.
    #[must_use]
    pub fn new(param_name: impl Into<Cow<'static, str>>) -> Self {
        Self::from(ExceptionCore::new(Self::DEFAULT_MESSAGE)).with_param_name(param_name)
    }

    /// Sets the name of the offending parameter.
    #[must_use]
    pub fn with_param_name(mut self, param_name: impl Into<Cow<'static, str>>) -> Self {
        self.base = self.base.with_param_name(param_name);
        self
    }

    /// Sets the value that was out of range.
    #[must_use]
    pub fn with_actual_value(mut self, actual_value: impl Into<Value>) -> Self {
        self.actual_value = actual_value.into();
        self
    }

    /// The name of the offending parameter.
    #[must_use]
    pub fn param_name(&self) -> Option<&str> {
        self.base.param_name()
    }

    /// The value that was out of range, [`Value::Null`] when unknown.
    #[must_use]
    pub fn actual_value(&self) -> &Value {
        &self.actual_value
    }
}

impl From<ExceptionCore> for ArgumentOutOfRangeException {
    fn from(core: ExceptionCore) -> Self {
        Self {
            base: ArgumentException::from(core),
            actual_value: Value::Null,
        }
    }
}

crate::__impl_exception!(ArgumentOutOfRangeException, ARGUMENT_OUT_OF_RANGE_EXCEPTION);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exceptions::Exception;

    #[test]
    fn test_param_name_reaches_derived_types() {
        let exception = ArgumentOutOfRangeException::new("index").with_actual_value(12);
        let erased: &dyn Reflect = &exception;

        assert_eq!(param_name(erased).unwrap(), Value::from("index"));
        assert_eq!(actual_value(erased).unwrap(), Value::from(12));
        assert_eq!(
            exception.core().message(),
            ArgumentOutOfRangeException::DEFAULT_MESSAGE
        );
    }

    #[test]
    fn test_actual_value_needs_the_right_type() {
        let exception = ArgumentNullException::new("name");
        let thrown = actual_value(&exception).unwrap_err();
        assert_eq!(thrown.type_name(), "InvalidCastException");
    }
}
