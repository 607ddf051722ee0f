//! Conversion of [`anyhow`] 1.x errors into exceptions.
//!
//! This module requires the `compat-anyhow1` feature flag.
//!
//! ```
//! use exdetail::compat::IntoException;
//!
//! fn load() -> anyhow::Result<String> {
//!     Err(anyhow::anyhow!("file missing").context("loading settings"))
//! }
//!
//! let exception = load().into_exception().unwrap_err();
//! assert_eq!(exception.message(), "loading settings");
//! assert_eq!(exception.inner_exception().unwrap().message(), "file missing");
//! ```

use super::{IntoException, boxed_error::ErrorException};
use crate::exceptions::{Exception, ExceptionRef};

/// Error type recorded for converted [`anyhow::Error`]s.
pub const ANYHOW_ERROR_TYPE: &str = "anyhow::Error";

impl IntoException for anyhow::Error {
    type Output = ExceptionRef;

    fn into_exception(self) -> Self::Output {
        let error: &(dyn core::error::Error + Send + Sync + 'static) = self.as_ref();
        ErrorException::from_error(error)
            .with_error_type(ANYHOW_ERROR_TYPE)
            .into_ref()
    }
}

impl<T> IntoException for anyhow::Result<T> {
    type Output = Result<T, ExceptionRef>;

    fn into_exception(self) -> Self::Output {
        self.map_err(IntoException::into_exception)
    }
}
