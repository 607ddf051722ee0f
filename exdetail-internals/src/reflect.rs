//! The [`Reflect`] trait.

use core::{
    any::{Any, TypeId, type_name},
    fmt,
};

use crate::{shape::Shape, thrown::Thrown, type_info::TypeInfo};

/// An object that can take part in a destructured object graph.
///
/// Implementors describe themselves through a static [`TypeInfo`] and tell the
/// engine how to walk them through [`shape`](Reflect::shape). Plain records
/// keep the default [`Shape::Object`] and are walked property by property;
/// containers, URIs, cancellation tokens and task handles return the
/// corresponding [`Shape`] variant instead.
///
/// # Required methods
///
/// - [`type_info`](Reflect::type_info): the runtime type of the instance
/// - [`as_any`](Reflect::as_any): the instance as [`Any`], always `self`
///
/// # Derived types
///
/// A type whose [`TypeInfo`] names a base type must override
/// [`upcast`](Reflect::upcast) so that getters declared on the base type can
/// find the struct holding the base fields. See the crate-level example.
pub trait Reflect: Any + Send + Sync + 'static {
    /// The runtime type of this instance.
    fn type_info(&self) -> &'static TypeInfo;

    /// Returns `self` as [`Any`].
    fn as_any(&self) -> &dyn Any;

    /// Returns the part of this instance that stores the fields of the type
    /// whose struct has the given `TypeId`.
    ///
    /// The default implementation only knows about `self`.
    fn upcast(&self, type_id: TypeId) -> Option<&dyn Any> {
        let any = self.as_any();
        (Any::type_id(any) == type_id).then_some(any)
    }

    /// How the destructuring engine should walk this object.
    fn shape(&self) -> Shape<'_> {
        Shape::Object
    }

    /// Writes the textual form of the object, used when it is emitted
    /// unexpanded. Defaults to the full type name.
    fn describe(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_info().full_name())
    }
}

impl dyn Reflect {
    /// Returns `true` if the concrete type of the instance is `T`.
    #[must_use]
    pub fn is<T: Any>(&self) -> bool {
        self.as_any().is::<T>()
    }

    /// Downcasts to the concrete type of the instance.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_any().downcast_ref()
    }

    /// Returns the part of the instance stored as a `T`, which is either the
    /// instance itself or the struct of one of its ancestors.
    ///
    /// # Errors
    ///
    /// Fails with an invalid cast [`Thrown`] when the instance has no such
    /// part, which is what a getter should report when it is handed an object
    /// of the wrong type.
    pub fn part<T: Any>(&self) -> Result<&T, Thrown> {
        self.upcast(TypeId::of::<T>())
            .and_then(<dyn Any>::downcast_ref::<T>)
            .ok_or_else(|| Thrown::invalid_cast(self.type_info().full_name(), type_name::<T>()))
    }
}

impl fmt::Display for dyn Reflect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.describe(f)
    }
}

impl fmt::Debug for dyn Reflect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Reflect({})", self.type_info().full_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Base {
        label: &'static str,
    }

    struct Derived {
        base: Base,
    }

    struct Unrelated;

    static BASE: TypeInfo = TypeInfo::new::<Base>("Base", "test::Base");
    static DERIVED: TypeInfo = TypeInfo::new::<Derived>("Derived", "test::Derived").extends(&BASE);
    static UNRELATED: TypeInfo = TypeInfo::new::<Unrelated>("Unrelated", "test::Unrelated");

    impl Reflect for Base {
        fn type_info(&self) -> &'static TypeInfo {
            &BASE
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    impl Reflect for Derived {
        fn type_info(&self) -> &'static TypeInfo {
            &DERIVED
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn upcast(&self, type_id: TypeId) -> Option<&dyn Any> {
            if type_id == TypeId::of::<Self>() {
                Some(self)
            } else {
                self.base.upcast(type_id)
            }
        }
    }

    impl Reflect for Unrelated {
        fn type_info(&self) -> &'static TypeInfo {
            &UNRELATED
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn test_part_reaches_base_struct() {
        let derived = Derived {
            base: Base { label: "inner" },
        };
        let erased: &dyn Reflect = &derived;
        assert_eq!(erased.part::<Base>().unwrap().label, "inner");
        assert!(erased.part::<Derived>().is_ok());
        assert!(erased.is::<Derived>());
        assert!(!erased.is::<Base>());
    }

    #[test]
    fn test_part_mismatch_is_invalid_cast() {
        let erased: &dyn Reflect = &Unrelated;
        let thrown = erased.part::<Base>().unwrap_err();
        assert_eq!(thrown.type_name(), "InvalidCastException");
        assert!(thrown.message().contains("test::Unrelated"));
    }

    #[test]
    fn test_display_uses_describe() {
        let erased: &dyn Reflect = &Unrelated;
        assert_eq!(erased.to_string(), "test::Unrelated");
        assert_eq!(format!("{erased:?}"), "Reflect(test::Unrelated)");
    }
}
