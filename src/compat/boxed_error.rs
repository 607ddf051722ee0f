//! Snapshots of [`core::error::Error`] values.
//!
//! An [`ErrorException`] copies what an error exposes: its message, from
//! `Display`, and its `source()` chain, which becomes a chain of inner
//! exceptions. The original error is not kept, so the snapshot is `Send +
//! Sync` whatever the error is.
//!
//! ```
//! use std::error::Error;
//!
//! use exdetail::compat::IntoException;
//!
//! let error: Box<dyn Error + Send + Sync> = "disk full".into();
//! let exception = error.into_exception();
//! assert_eq!(exception.message(), "disk full");
//! assert!(exception.inner_exception().is_none());
//! ```

use core::{any::type_name, error::Error};
use std::borrow::Cow;

use exdetail_internals::{PropertyDecl, Reflect, Thrown, TypeInfo, Value};

use super::IntoException;
use crate::exceptions::{EXCEPTION, Exception, ExceptionCore, ExceptionRef};

/// Longest `source()` chain converted into inner exceptions.
pub const MAX_SOURCE_CHAIN: usize = 64;

static ERROR_EXCEPTION_PROPERTIES: [PropertyDecl; 1] =
    [PropertyDecl::new("ErrorType", error_type)];

/// Type descriptor of [`ErrorException`].
pub static ERROR_EXCEPTION: TypeInfo = TypeInfo::new::<ErrorException>(
    "ErrorException",
    concat!(module_path!(), "::ErrorException"),
)
.extends(&EXCEPTION)
.with_properties(&ERROR_EXCEPTION_PROPERTIES);

fn error_type(this: &dyn Reflect) -> Result<Value, Thrown> {
    Ok(this.part::<ErrorException>()?.error_type.clone().into())
}

/// An exception snapshotted from a Rust error.
pub struct ErrorException {
    base: ExceptionCore,
    error_type: Cow<'static, str>,
}

impl ErrorException {
    /// Snapshots `error` and its `source()` chain, up to
    /// [`MAX_SOURCE_CHAIN`] levels deep.
    ///
    /// The error type of the outermost exception is the name of `E`. The
    /// sources are only known as trait objects, so their error type is the
    /// name of `dyn Error`.
    #[must_use]
    pub fn from_error<E: Error + ?Sized>(error: &E) -> Self {
        let mut sources = Vec::new();
        let mut next = error.source();
        while let Some(source) = next {
            if sources.len() == MAX_SOURCE_CHAIN {
                tracing::debug!(
                    max = MAX_SOURCE_CHAIN,
                    "error source chain truncated"
                );
                break;
            }
            sources.push(source.to_string());
            next = source.source();
        }

        let inner = sources.into_iter().rev().fold(None, |inner, message| {
            let core = ExceptionCore::new(message);
            let core = match inner {
                Some(inner) => core.with_inner_exception(inner),
                None => core,
            };
            Some(Self::with_core(core, type_name::<dyn Error>()).into_ref())
        });

        let core = ExceptionCore::new(error.to_string());
        let core = match inner {
            Some(inner) => core.with_inner_exception(inner),
            None => core,
        };
        Self::with_core(core, type_name::<E>())
    }

    fn with_core(base: ExceptionCore, error_type: impl Into<Cow<'static, str>>) -> Self {
        Self {
            base,
            error_type: error_type.into(),
        }
    }

    /// Replaces the recorded error type.
    #[must_use]
    pub fn with_error_type(mut self, error_type: impl Into<Cow<'static, str>>) -> Self {
        self.error_type = error_type.into();
        self
    }

    /// Name of the Rust type of the snapshotted error.
    #[must_use]
    pub fn error_type(&self) -> &str {
        &self.error_type
    }
}

crate::__impl_exception!(ErrorException, ERROR_EXCEPTION);

impl IntoException for Box<dyn Error + Send + Sync> {
    type Output = ExceptionRef;

    fn into_exception(self) -> Self::Output {
        ErrorException::from_error(&*self).into_ref()
    }
}

impl IntoException for Box<dyn Error> {
    type Output = ExceptionRef;

    fn into_exception(self) -> Self::Output {
        ErrorException::from_error(&*self).into_ref()
    }
}

impl<T> IntoException for Result<T, Box<dyn Error + Send + Sync>> {
    type Output = Result<T, ExceptionRef>;

    fn into_exception(self) -> Self::Output {
        self.map_err(IntoException::into_exception)
    }
}

impl<T> IntoException for Result<T, Box<dyn Error>> {
    type Output = Result<T, ExceptionRef>;

    fn into_exception(self) -> Self::Output {
        self.map_err(IntoException::into_exception)
    }
}

#[cfg(test)]
mod tests {
    use core::fmt;

    use super::*;

    #[derive(Debug)]
    struct Layer {
        message: &'static str,
        source: Option<Box<Layer>>,
    }

    impl fmt::Display for Layer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.message)
        }
    }

    impl Error for Layer {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            self.source.as_deref().map(|source| source as _)
        }
    }

    fn chain(depth: usize) -> Layer {
        (0..depth).fold(
            Layer {
                message: "root",
                source: None,
            },
            |source, _| Layer {
                message: "wrapper",
                source: Some(Box::new(source)),
            },
        )
    }

    #[test]
    fn test_source_chain_becomes_inner_exceptions() {
        let exception = ErrorException::from_error(&chain(2));
        assert_eq!(exception.core().message(), "wrapper");
        assert!(exception.error_type().ends_with("Layer"));

        let inner = exception.core().inner_exception().unwrap();
        assert_eq!(inner.message(), "wrapper");
        let innermost = inner.inner_exception().unwrap();
        assert_eq!(innermost.message(), "root");
        assert!(innermost.inner_exception().is_none());
        assert!(innermost.is::<ErrorException>());
    }

    #[test]
    fn test_chain_is_capped() {
        let exception = ErrorException::from_error(&chain(MAX_SOURCE_CHAIN + 10));
        let mut depth = 0;
        let mut next = exception.core().inner_exception();
        while let Some(inner) = next {
            depth += 1;
            next = inner.inner_exception();
        }
        assert_eq!(depth, MAX_SOURCE_CHAIN);
    }

    #[test]
    fn test_result_conversion() {
        let result: Result<(), Box<dyn Error + Send + Sync>> = Err("nope".into());
        let exception = result.into_exception().unwrap_err();
        assert_eq!(exception.message(), "nope");
        assert_eq!(
            exception.downcast_ref::<ErrorException>().map(ErrorException::error_type),
            Some(type_name::<dyn Error + Send + Sync>())
        );
    }
}
