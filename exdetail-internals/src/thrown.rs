//! Failures reported by property getters.

use core::{any::Any, fmt};
use std::borrow::Cow;

/// The failure raised while reading a property.
///
/// A getter returns `Err(Thrown)` where a managed runtime would throw. The
/// destructuring engine never propagates it: the property's value becomes the
/// [`Display`](fmt::Display) form of the `Thrown`,
/// `threw {type_name}: {message}`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Thrown {
    type_name: Cow<'static, str>,
    message: Cow<'static, str>,
}

impl Thrown {
    /// Creates a failure of the exception type `type_name`.
    #[must_use]
    pub fn new(
        type_name: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            message: message.into(),
        }
    }

    /// The failure reported when an object is not of the expected type.
    #[must_use]
    pub fn invalid_cast(actual: &str, expected: &str) -> Self {
        Self::new(
            "InvalidCastException",
            format!("object of type `{actual}` cannot be read as `{expected}`"),
        )
    }

    /// Converts a panic payload caught while running a getter.
    #[must_use]
    pub fn from_panic(payload: &(dyn Any + Send)) -> Self {
        let message = if let Some(message) = payload.downcast_ref::<&'static str>() {
            Cow::Borrowed(*message)
        } else if let Some(message) = payload.downcast_ref::<String>() {
            Cow::Owned(message.clone())
        } else {
            Cow::Borrowed("panic payload of unknown type")
        };
        Self {
            type_name: Cow::Borrowed("panic"),
            message,
        }
    }

    /// Full name of the exception type.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The failure message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Thrown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "threw {}: {}", self.type_name, self.message)
    }
}

impl core::error::Error for Thrown {}
