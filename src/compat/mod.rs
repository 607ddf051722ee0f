//! Bringing errors of the Rust ecosystem into the exception model.
//!
//! Exceptions are what the engine destructures, but most Rust code reports
//! failures through [`core::error::Error`]. The conversions in this module
//! snapshot such an error, and its `source()` chain, into an
//! [`ErrorException`](boxed_error::ErrorException) so it can be attached to a
//! log record.
//!
//! # Available Integrations
//!
//! - [`boxed_error`] - Any `Box<dyn Error + Send + Sync>`, or any error value
//!   through [`ErrorException::from_error`](boxed_error::ErrorException::from_error)
//! - [`anyhow1`] - `anyhow` 1.x errors (requires the `compat-anyhow1` feature
//!   flag)
//!
//! # Example
//!
//! ```
//! use exdetail::{compat::IntoException, exceptions::ExceptionRef};
//!
//! fn parse_port(text: &str) -> Result<u16, Box<dyn std::error::Error + Send + Sync>> {
//!     Ok(text.parse::<u16>()?)
//! }
//!
//! let exception: ExceptionRef = parse_port("http").into_exception().unwrap_err();
//! assert_eq!(exception.message(), "invalid digit found in string");
//! ```

use crate::exceptions::{Exception, ExceptionRef};

pub mod boxed_error;

#[cfg(feature = "compat-anyhow1")]
#[cfg_attr(docsrs, doc(cfg(feature = "compat-anyhow1")))]
pub mod anyhow1;

/// Conversion of errors, and of the error side of `Result`s, into
/// [`ExceptionRef`]s.
pub trait IntoException {
    /// The type produced by the conversion: [`ExceptionRef`] for errors,
    /// `Result<T, ExceptionRef>` for results.
    type Output;

    /// Performs the conversion.
    fn into_exception(self) -> Self::Output;
}

impl<E: Exception> IntoException for E {
    type Output = ExceptionRef;

    fn into_exception(self) -> Self::Output {
        self.into_ref()
    }
}

impl IntoException for ExceptionRef {
    type Output = ExceptionRef;

    fn into_exception(self) -> Self::Output {
        self
    }
}
