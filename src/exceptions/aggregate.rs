use std::borrow::Cow;

use exdetail_internals::{Obj, PropertyDecl, Reflect, Thrown, TypeInfo, Value};

use super::{EXCEPTION, ExceptionCore, ExceptionRef};
use crate::objects::List;

static AGGREGATE_EXCEPTION_PROPERTIES: [PropertyDecl; 1] =
    [PropertyDecl::new("InnerExceptions", inner_exceptions)];

/// Type descriptor of [`AggregateException`].
pub static AGGREGATE_EXCEPTION: TypeInfo = TypeInfo::new::<AggregateException>(
    "AggregateException",
    concat!(module_path!(), "::AggregateException"),
)
.extends(&EXCEPTION)
.with_properties(&AGGREGATE_EXCEPTION_PROPERTIES);

fn inner_exceptions(this: &dyn Reflect) -> Result<Value, Thrown> {
    let this = this.part::<AggregateException>()?;
    Ok(Value::object(
        this.inner_exceptions
            .iter()
            .map(|inner| {
                let inner: Obj = inner.clone();
                Value::Object(inner)
            })
            .collect::<List>(),
    ))
}

/// Several errors raised during one operation.
///
/// The first inner exception is also the
/// [`inner_exception`](ExceptionCore::inner_exception) of the aggregate.
///
/// # Examples
///
/// ```
/// use exdetail::exceptions::{AggregateException, Exception, ExceptionCore};
///
/// let exception = AggregateException::new([
///     ExceptionCore::new("first").into_ref(),
///     ExceptionCore::new("second").into_ref(),
/// ]);
/// assert_eq!(
///     exception.core().message(),
///     "One or more errors occurred. (first) (second)"
/// );
/// assert_eq!(exception.inner_exceptions().len(), 2);
/// ```
pub struct AggregateException {
    base: ExceptionCore,
    inner_exceptions: Vec<ExceptionRef>,
}

impl AggregateException {
    /// The message used when none is given.
    pub const DEFAULT_MESSAGE: &'static str = "One or more errors occurred.";

    /// Creates the exception with the default message followed by the
    /// message of each inner exception.
    #[must_use]
    pub fn new(inner_exceptions: impl IntoIterator<Item = ExceptionRef>) -> Self {
        let inner_exceptions: Vec<_> = inner_exceptions.into_iter().collect();
        let mut message = String::from(Self::DEFAULT_MESSAGE);
        for inner in &inner_exceptions {
            message.push_str(" (");
            message.push_str(inner.message());
            message.push(')');
        }
        Self::with_core(ExceptionCore::new(message), inner_exceptions)
    }

    /// Creates the exception with the given message.
    #[must_use]
    pub fn with_message(
        message: impl Into<Cow<'static, str>>,
        inner_exceptions: impl IntoIterator<Item = ExceptionRef>,
    ) -> Self {
        Self::with_core(
            ExceptionCore::new(message),
            inner_exceptions.into_iter().collect(),
        )
    }

    fn with_core(core: ExceptionCore, inner_exceptions: Vec<ExceptionRef>) -> Self {
        let base = match inner_exceptions.first() {
            Some(first) => core.with_inner_exception(first.clone()),
            None => core,
        };
        Self {
            base,
            inner_exceptions,
        }
    }

    /// The inner exceptions, in the order they were given.
    #[must_use]
    pub fn inner_exceptions(&self) -> &[ExceptionRef] {
        &self.inner_exceptions
    }
}

crate::__impl_exception!(AggregateException, AGGREGATE_EXCEPTION);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exceptions::Exception;

    #[test]
    fn test_first_inner_is_the_inner_exception() {
        let first = ExceptionCore::new("a").into_ref();
        let second = ExceptionCore::new("b").into_ref();
        let exception = AggregateException::with_message("batch failed", [first.clone(), second]);

        assert_eq!(exception.core().message(), "batch failed");
        let inner = exception.core().inner_exception().unwrap();
        assert!(std::sync::Arc::ptr_eq(inner, &first));
    }

    #[test]
    fn test_empty_aggregate() {
        let exception = AggregateException::new([]);
        assert_eq!(exception.core().message(), AggregateException::DEFAULT_MESSAGE);
        assert!(exception.core().inner_exception().is_none());
    }
}
