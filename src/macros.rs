/// Declares an exception type that adds no properties to its base type.
///
/// The generated struct embeds its base in a field named `base`, gets a
/// static type descriptor extending the base's descriptor, a `new(message)`
/// constructor, a `From<ExceptionCore>` conversion, and the [`Reflect`] and
/// [`Exception`] implementations.
///
/// The base type must itself implement `From<ExceptionCore>`, which every
/// exception type of this crate and every type declared with this macro
/// does.
///
/// [`Reflect`]: crate::Reflect
/// [`Exception`]: crate::exceptions::Exception
///
/// # Examples
///
/// ```
/// use exdetail::{
///     exceptions::{Exception, INVALID_OPERATION_EXCEPTION, InvalidOperationException},
///     simple_exception,
/// };
///
/// simple_exception! {
///     /// The connection pool has no free connection left.
///     pub struct PoolExhaustedException: InvalidOperationException;
///     pub static POOL_EXHAUSTED_EXCEPTION extends INVALID_OPERATION_EXCEPTION;
/// }
///
/// let exception = PoolExhaustedException::new("no connection available");
/// assert_eq!(exception.core().message(), "no connection available");
/// assert_eq!(POOL_EXHAUSTED_EXCEPTION.name(), "PoolExhaustedException");
/// assert!(POOL_EXHAUSTED_EXCEPTION.is_subclass_of(&INVALID_OPERATION_EXCEPTION));
/// ```
#[macro_export]
macro_rules! simple_exception {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident: $base:ty;
        $static_vis:vis static $info:ident extends $base_info:path;
    ) => {
        $(#[$meta])*
        $vis struct $name {
            base: $base,
        }

        #[doc = concat!("Type descriptor of [`", stringify!($name), "`].")]
        $static_vis static $info: $crate::TypeInfo = $crate::TypeInfo::new::<$name>(
            stringify!($name),
            concat!(module_path!(), "::", stringify!($name)),
        )
        .extends(&$base_info);

        impl $name {
            /// Creates the exception with the given message.
            #[must_use]
            pub fn new(
                message: impl ::core::convert::Into<$crate::__private::Cow<'static, str>>,
            ) -> Self {
                Self::from($crate::exceptions::ExceptionCore::new(message))
            }
        }

        impl ::core::convert::From<$crate::exceptions::ExceptionCore> for $name {
            fn from(core: $crate::exceptions::ExceptionCore) -> Self {
                Self {
                    base: <$base>::from(core),
                }
            }
        }

        $crate::__impl_exception!($name, $info);
    };
}

/// Implements [`Reflect`](crate::Reflect) and
/// [`Exception`](crate::exceptions::Exception) for a struct that embeds its
/// base exception in a field named `base`.
#[doc(hidden)]
#[macro_export]
macro_rules! __impl_exception {
    ($name:ty, $info:path) => {
        impl $crate::Reflect for $name {
            fn type_info(&self) -> &'static $crate::TypeInfo {
                &$info
            }

            fn as_any(&self) -> &dyn ::core::any::Any {
                self
            }

            fn upcast(&self, type_id: ::core::any::TypeId) -> Option<&dyn ::core::any::Any> {
                if type_id == ::core::any::TypeId::of::<Self>() {
                    Some(self)
                } else {
                    $crate::Reflect::upcast(&self.base, type_id)
                }
            }
        }

        impl $crate::exceptions::Exception for $name {
            fn core(&self) -> &$crate::exceptions::ExceptionCore {
                $crate::exceptions::Exception::core(&self.base)
            }
        }
    };
}
