//! Erased values read from properties.

use core::{fmt, time::Duration};
use std::{borrow::Cow, sync::Arc, time::SystemTime};

use crate::reflect::Reflect;

/// A shared reflectable object.
///
/// The identity of an object is the address of the `Arc` allocation, so two
/// clones of the same `Obj` are the same object while two equal but separately
/// allocated objects are not.
pub type Obj = Arc<dyn Reflect>;

/// Values with value semantics: they are never walked, only copied.
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    /// A boolean.
    Bool(bool),
    /// A character.
    Char(char),
    /// A signed integer.
    I64(i64),
    /// An unsigned integer.
    U64(u64),
    /// A floating point number.
    F64(f64),
    /// A string.
    String(Cow<'static, str>),
    /// A member of an enumeration, kept as its label.
    Enum {
        /// Full name of the enumeration type.
        type_name: &'static str,
        /// Label of the member.
        label: Cow<'static, str>,
    },
    /// A point in time.
    Timestamp(SystemTime),
    /// A time span.
    Duration(Duration),
}

impl Scalar {
    /// Creates an enumeration member.
    #[must_use]
    pub fn enumeration(type_name: &'static str, label: impl Into<Cow<'static, str>>) -> Self {
        Scalar::Enum {
            type_name,
            label: label.into(),
        }
    }

    /// Returns the string payload of [`Scalar::String`].
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(value) => fmt::Display::fmt(value, f),
            Scalar::Char(value) => fmt::Display::fmt(value, f),
            Scalar::I64(value) => fmt::Display::fmt(value, f),
            Scalar::U64(value) => fmt::Display::fmt(value, f),
            Scalar::F64(value) => fmt::Display::fmt(value, f),
            Scalar::String(value) => f.write_str(value),
            Scalar::Enum { label, .. } => f.write_str(label),
            Scalar::Timestamp(value) => match value.duration_since(SystemTime::UNIX_EPOCH) {
                Ok(since) => write!(f, "{}s", since.as_secs_f64()),
                Err(before) => write!(f, "-{}s", before.duration().as_secs_f64()),
            },
            Scalar::Duration(value) => write!(f, "{value:?}"),
        }
    }
}

macro_rules! scalar_from {
    ($($source:ty => $variant:ident as $target:ty),* $(,)?) => {
        $(
            impl From<$source> for Scalar {
                fn from(value: $source) -> Self {
                    Scalar::$variant(<$target>::from(value))
                }
            }

            impl From<$source> for Value {
                fn from(value: $source) -> Self {
                    Value::Scalar(Scalar::from(value))
                }
            }
        )*
    };
}

scalar_from!(
    bool => Bool as bool,
    char => Char as char,
    i8 => I64 as i64,
    i16 => I64 as i64,
    i32 => I64 as i64,
    i64 => I64 as i64,
    u8 => U64 as u64,
    u16 => U64 as u64,
    u32 => U64 as u64,
    u64 => U64 as u64,
    f32 => F64 as f64,
    f64 => F64 as f64,
    &'static str => String as Cow<'static, str>,
    String => String as Cow<'static, str>,
    Cow<'static, str> => String as Cow<'static, str>,
    SystemTime => Timestamp as SystemTime,
    Duration => Duration as Duration,
);

impl From<usize> for Scalar {
    fn from(value: usize) -> Self {
        Scalar::U64(value as u64)
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        Value::Scalar(Scalar::from(value))
    }
}

/// A value read from a property.
#[derive(Clone, Default)]
pub enum Value {
    /// No value.
    #[default]
    Null,
    /// A value-semantics value.
    Scalar(Scalar),
    /// A reference to a shared object.
    Object(Obj),
}

impl Value {
    /// Moves `object` into a new shared allocation.
    #[must_use]
    pub fn object<T: Reflect>(object: T) -> Self {
        Value::Object(Arc::new(object))
    }

    /// Wraps an already shared object, keeping its identity.
    #[must_use]
    pub fn shared<T: Reflect>(object: &Arc<T>) -> Self {
        let object: Obj = object.clone();
        Value::Object(object)
    }

    /// Returns `true` for [`Value::Null`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the scalar, if this is one.
    #[must_use]
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Value::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    /// Returns the object, if this is one.
    #[must_use]
    pub fn as_object(&self) -> Option<&Obj> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    /// The identity of the referenced object, if any.
    #[must_use]
    pub fn identity(&self) -> Option<usize> {
        self.as_object().map(identity_of)
    }

    /// Renders the value as a dictionary key.
    #[must_use]
    pub fn to_key_string(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Scalar(scalar) => scalar.to_string(),
            Value::Object(object) => object.to_string(),
        }
    }
}

/// The identity of a shared object: the address of its allocation.
#[must_use]
pub fn identity_of(object: &Obj) -> usize {
    Arc::as_ptr(object).cast::<()>() as usize
}

impl From<Scalar> for Value {
    fn from(value: Scalar) -> Self {
        Value::Scalar(value)
    }
}

impl From<Obj> for Value {
    fn from(value: Obj) -> Self {
        Value::Object(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Scalar(left), Value::Scalar(right)) => left == right,
            (Value::Object(left), Value::Object(right)) => Arc::ptr_eq(left, right),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Scalar(scalar) => f.debug_tuple("Scalar").field(scalar).finish(),
            Value::Object(object) => f
                .debug_tuple("Object")
                .field(&object.type_info().full_name())
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use core::any::Any;

    use super::*;
    use crate::type_info::TypeInfo;

    struct Marker;

    static MARKER: TypeInfo = TypeInfo::new::<Marker>("Marker", "test::Marker");

    impl Reflect for Marker {
        fn type_info(&self) -> &'static TypeInfo {
            &MARKER
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn test_identity_follows_allocation() {
        let first = Arc::new(Marker);
        let same = Value::shared(&first);
        let again = Value::shared(&first);
        let other = Value::object(Marker);

        assert_eq!(same.identity(), again.identity());
        assert_ne!(same.identity(), other.identity());
        assert_eq!(same, again);
        assert_ne!(same, other);
        assert_eq!(Value::from(3).identity(), None);
    }

    #[test]
    fn test_conversions() {
        assert_eq!(Value::from(7u8), Value::Scalar(Scalar::U64(7)));
        assert_eq!(Value::from(-7i32), Value::Scalar(Scalar::I64(-7)));
        assert_eq!(Value::from(None::<&'static str>), Value::Null);
        assert_eq!(
            Value::from(Some("text")).as_scalar().and_then(Scalar::as_str),
            Some("text")
        );
    }

    #[test]
    fn test_key_strings() {
        assert_eq!(Value::from(42).to_key_string(), "42");
        assert_eq!(Value::object(Marker).to_key_string(), "test::Marker");
        assert_eq!(
            Value::from(Scalar::enumeration("test::Color", "Red")).to_key_string(),
            "Red"
        );
        assert_eq!(Value::Null.to_key_string(), "");
    }

    #[test]
    fn test_debug_names_objects() {
        assert_eq!(format!("{:?}", Value::object(Marker)), "Object(\"test::Marker\")");
    }
}
