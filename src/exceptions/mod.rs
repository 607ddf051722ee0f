//! The exception model.
//!
//! Every exception is a struct that embeds its base type's struct in a field
//! named `base`, down to [`ExceptionCore`], which holds the fields every
//! exception carries. The [`Exception`] trait gives the destructurers direct
//! access to that core; everything else is read through the [`Reflect`]
//! property declarations.
//!
//! Types without extra fields are declared with
//! [`simple_exception!`](crate::simple_exception).

use core::{any::Any, fmt};
use std::{borrow::Cow, sync::Arc};

use exdetail_internals::{Obj, PropertyDecl, Reflect, Thrown, TypeInfo, Value};

use crate::objects::{Dictionary, MemberHandle};

mod aggregate;
mod argument;
mod canceled;
mod socket;
mod system;
mod type_load;

pub use self::{
    aggregate::{AGGREGATE_EXCEPTION, AggregateException},
    argument::{
        ARGUMENT_EXCEPTION, ARGUMENT_NULL_EXCEPTION, ARGUMENT_OUT_OF_RANGE_EXCEPTION,
        ArgumentException, ArgumentNullException, ArgumentOutOfRangeException,
    },
    canceled::{
        OPERATION_CANCELED_EXCEPTION, OperationCanceledException, TASK_CANCELED_EXCEPTION,
        TaskCanceledException,
    },
    socket::{SOCKET_EXCEPTION, SocketError, SocketException},
    system::{
        ARITHMETIC_EXCEPTION, ArithmeticException, DIVIDE_BY_ZERO_EXCEPTION,
        DivideByZeroException, FORMAT_EXCEPTION, FormatException, INVALID_OPERATION_EXCEPTION,
        InvalidOperationException, NOT_IMPLEMENTED_EXCEPTION, NOT_SUPPORTED_EXCEPTION,
        NotImplementedException, NotSupportedException, SYSTEM_EXCEPTION, SystemException,
        TIMEOUT_EXCEPTION, TimeoutException,
    },
    type_load::{REFLECTION_TYPE_LOAD_EXCEPTION, ReflectionTypeLoadException},
};

/// A shared exception.
pub type ExceptionRef = Arc<dyn Exception>;

/// An exception: a reflectable object carrying an [`ExceptionCore`].
pub trait Exception: Reflect {
    /// The fields shared by every exception.
    fn core(&self) -> &ExceptionCore;

    /// Moves the exception into a shared allocation.
    fn into_ref(self) -> ExceptionRef
    where
        Self: Sized,
    {
        Arc::new(self)
    }
}

impl dyn Exception {
    /// The exception message.
    #[must_use]
    pub fn message(&self) -> &str {
        self.core().message()
    }

    /// The exception that caused this one.
    #[must_use]
    pub fn inner_exception(&self) -> Option<&ExceptionRef> {
        self.core().inner_exception()
    }

    /// The exception as a plain reflectable object.
    #[must_use]
    pub fn as_reflect(&self) -> &dyn Reflect {
        self
    }

    /// Returns `true` if the concrete type of the exception is `T`.
    #[must_use]
    pub fn is<T: Any>(&self) -> bool {
        self.as_reflect().is::<T>()
    }

    /// Downcasts to the concrete type of the exception.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_reflect().downcast_ref::<T>()
    }

    /// Returns the part of the exception stored as a `T`.
    ///
    /// # Errors
    ///
    /// Fails when the exception has no such part.
    pub fn part<T: Any>(&self) -> Result<&T, Thrown> {
        self.as_reflect().part::<T>()
    }
}

impl fmt::Display for dyn Exception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.type_info().full_name(), self.message())
    }
}

impl fmt::Debug for dyn Exception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(self.type_info().name())
            .field("message", &self.message())
            .field("inner", &self.inner_exception())
            .finish_non_exhaustive()
    }
}

static EXCEPTION_PROPERTIES: [PropertyDecl; 8] = [
    PropertyDecl::new("Data", data),
    PropertyDecl::new("HelpLink", help_link),
    PropertyDecl::new("HResult", hresult),
    PropertyDecl::new("InnerException", inner_exception),
    PropertyDecl::new("Message", message),
    PropertyDecl::new("Source", source),
    PropertyDecl::new("StackTrace", stack_trace),
    PropertyDecl::new("TargetSite", target_site),
];

/// Type descriptor of the root exception type.
pub static EXCEPTION: TypeInfo =
    TypeInfo::new::<ExceptionCore>("Exception", concat!(module_path!(), "::Exception"))
        .with_properties(&EXCEPTION_PROPERTIES);

fn data(this: &dyn Reflect) -> Result<Value, Thrown> {
    Ok(Value::shared(&this.part::<ExceptionCore>()?.data))
}

fn help_link(this: &dyn Reflect) -> Result<Value, Thrown> {
    Ok(this.part::<ExceptionCore>()?.help_link.clone().into())
}

fn hresult(this: &dyn Reflect) -> Result<Value, Thrown> {
    Ok(this.part::<ExceptionCore>()?.hresult.into())
}

fn inner_exception(this: &dyn Reflect) -> Result<Value, Thrown> {
    Ok(this
        .part::<ExceptionCore>()?
        .inner
        .clone()
        .map_or(Value::Null, |inner| {
            let inner: Obj = inner;
            Value::Object(inner)
        }))
}

fn message(this: &dyn Reflect) -> Result<Value, Thrown> {
    Ok(this.part::<ExceptionCore>()?.message.clone().into())
}

fn source(this: &dyn Reflect) -> Result<Value, Thrown> {
    Ok(this.part::<ExceptionCore>()?.source.clone().into())
}

fn stack_trace(this: &dyn Reflect) -> Result<Value, Thrown> {
    Ok(this.part::<ExceptionCore>()?.stack_trace.clone().into())
}

fn target_site(this: &dyn Reflect) -> Result<Value, Thrown> {
    Ok(this
        .part::<ExceptionCore>()?
        .target_site
        .map_or(Value::Null, Value::object))
}

/// The fields every exception carries. Also the root exception type itself.
///
/// # Examples
///
/// ```
/// use exdetail::exceptions::{Exception, ExceptionCore};
///
/// let cause = ExceptionCore::new("disk full").into_ref();
/// let exception = ExceptionCore::new("could not save")
///     .with_source("storage")
///     .with_data("file", "report.csv")
///     .with_inner_exception(cause);
/// assert_eq!(exception.message(), "could not save");
/// assert!(exception.inner_exception().is_some());
/// ```
pub struct ExceptionCore {
    message: Cow<'static, str>,
    data: Arc<Dictionary>,
    help_link: Option<Cow<'static, str>>,
    hresult: i32,
    source: Option<Cow<'static, str>>,
    stack_trace: Option<Cow<'static, str>>,
    inner: Option<ExceptionRef>,
    target_site: Option<MemberHandle>,
}

impl ExceptionCore {
    /// Creates an exception with the given message and no other field set.
    #[must_use]
    pub fn new(message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            message: message.into(),
            data: Arc::new(Dictionary::new()),
            help_link: None,
            hresult: 0,
            source: None,
            stack_trace: None,
            inner: None,
            target_site: None,
        }
    }

    /// Adds an entry to the exception's data dictionary.
    #[must_use]
    pub fn with_data(self, key: impl Into<Value>, value: impl Into<Value>) -> Self {
        self.data.insert(key, value);
        self
    }

    /// Sets the help link.
    #[must_use]
    pub fn with_help_link(mut self, help_link: impl Into<Cow<'static, str>>) -> Self {
        self.help_link = Some(help_link.into());
        self
    }

    /// Sets the numeric result code.
    #[must_use]
    pub fn with_hresult(mut self, hresult: i32) -> Self {
        self.hresult = hresult;
        self
    }

    /// Sets the name of the component that raised the exception.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<Cow<'static, str>>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Sets the stack trace text.
    #[must_use]
    pub fn with_stack_trace(mut self, stack_trace: impl Into<Cow<'static, str>>) -> Self {
        self.stack_trace = Some(stack_trace.into());
        self
    }

    /// Captures the current stack as the stack trace.
    #[cfg(feature = "backtrace")]
    #[cfg_attr(docsrs, doc(cfg(feature = "backtrace")))]
    #[must_use]
    pub fn with_captured_stack_trace(self) -> Self {
        let backtrace = backtrace::Backtrace::new();
        self.with_stack_trace(format!("{backtrace:?}"))
    }

    /// Sets the exception that caused this one.
    #[must_use]
    pub fn with_inner_exception(mut self, inner: ExceptionRef) -> Self {
        self.inner = Some(inner);
        self
    }

    /// Sets the member that raised the exception.
    #[must_use]
    pub fn with_target_site(mut self, target_site: MemberHandle) -> Self {
        self.target_site = Some(target_site);
        self
    }

    /// The exception message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The data dictionary.
    #[must_use]
    pub fn data(&self) -> &Arc<Dictionary> {
        &self.data
    }

    /// The help link.
    #[must_use]
    pub fn help_link(&self) -> Option<&str> {
        self.help_link.as_deref()
    }

    /// The numeric result code, `0` when unset.
    #[must_use]
    pub fn hresult(&self) -> i32 {
        self.hresult
    }

    /// The name of the component that raised the exception.
    #[must_use]
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// The stack trace text.
    #[must_use]
    pub fn stack_trace(&self) -> Option<&str> {
        self.stack_trace.as_deref()
    }

    /// The exception that caused this one.
    #[must_use]
    pub fn inner_exception(&self) -> Option<&ExceptionRef> {
        self.inner.as_ref()
    }

    /// The member that raised the exception.
    #[must_use]
    pub fn target_site(&self) -> Option<&MemberHandle> {
        self.target_site.as_ref()
    }
}

impl Reflect for ExceptionCore {
    fn type_info(&self) -> &'static TypeInfo {
        &EXCEPTION
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Exception for ExceptionCore {
    fn core(&self) -> &ExceptionCore {
        self
    }
}

#[cfg(test)]
mod tests {
    use exdetail_internals::Access;

    use super::*;

    fn read(name: &str, target: &dyn Reflect) -> Value {
        let decl = EXCEPTION
            .declared_properties()
            .iter()
            .find(|decl| decl.name() == name)
            .unwrap();
        match decl.access() {
            Access::Get(getter) => getter(target).unwrap(),
            _ => panic!("{name} is not readable"),
        }
    }

    #[test]
    fn test_base_getters_read_derived_instances() {
        let exception = InvalidOperationException::from(
            ExceptionCore::new("bad state")
                .with_hresult(-5)
                .with_stack_trace("at main"),
        );

        assert_eq!(read("Message", &exception), Value::from("bad state"));
        assert_eq!(read("HResult", &exception), Value::from(-5));
        assert_eq!(read("StackTrace", &exception), Value::from("at main"));
        assert_eq!(read("Source", &exception), Value::Null);
        assert_eq!(read("InnerException", &exception), Value::Null);
    }

    #[test]
    fn test_data_keeps_identity() {
        let exception = ExceptionCore::new("x").with_data("k", 1);
        let first = read("Data", &exception);
        let second = read("Data", &exception);
        assert_eq!(first.identity(), second.identity());
    }

    #[test]
    fn test_display() {
        let exception: ExceptionRef = ExceptionCore::new("boom").into_ref();
        assert_eq!(
            exception.to_string(),
            "exdetail::exceptions::Exception: boom"
        );
    }
}
