//! Static type descriptors.
//!
//! A [`TypeInfo`] plays the role runtime type metadata plays in a managed
//! language: it names a type, points at its base type, and lists the
//! properties the type itself declares. Descriptors are meant to live in
//! `static`s, which is why every constructor is a `const fn`.
//!
//! Property arrays must be `static`s of their own, referenced from the type
//! descriptor:
//!
//! ```
//! use std::any::Any;
//!
//! use exdetail_internals::{PropertyDecl, Reflect, Thrown, TypeInfo, Value};
//!
//! struct Probe {
//!     depth: u32,
//! }
//!
//! fn depth(this: &dyn Reflect) -> Result<Value, Thrown> {
//!     Ok(this.part::<Probe>()?.depth.into())
//! }
//!
//! static PROBE_PROPERTIES: [PropertyDecl; 2] = [
//!     PropertyDecl::new("Depth", depth),
//!     PropertyDecl::write_only("Target"),
//! ];
//!
//! static PROBE: TypeInfo =
//!     TypeInfo::new::<Probe>("Probe", "sonar::Probe").with_properties(&PROBE_PROPERTIES);
//!
//! assert_eq!(PROBE.full_name(), "sonar::Probe");
//! assert!(PROBE.declared_properties()[0].is_readable());
//! assert!(!PROBE.declared_properties()[1].is_readable());
//! ```

use core::{
    any::{Any, TypeId},
    fmt,
};

use crate::{reflect::Reflect, thrown::Thrown, value::Value};

/// Reads one property from an instance.
///
/// The instance is the whole object, not just the part declared by the
/// property's type; use [`part`](crate::Reflect#method.part) to reach the
/// declaring struct.
pub type Getter = fn(&dyn Reflect) -> Result<Value, Thrown>;

/// Who may read a property.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Part of the type's public surface.
    Public,
    /// Internal to the type; never destructured.
    NonPublic,
}

/// Whether a property belongs to instances or to the type itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Receiver {
    /// Read from an instance.
    Instance,
    /// Shared by every instance of the type; never destructured.
    Static,
}

/// How a property can be accessed.
#[derive(Clone, Copy)]
pub enum Access {
    /// The property can only be assigned.
    WriteOnly,
    /// The property can be read and erased into a [`Value`].
    Get(Getter),
    /// The property can be read, but only by reference: its value cannot be
    /// erased into a [`Value`], so no accessor can be compiled for it.
    ByRef,
}

impl fmt::Debug for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Access::WriteOnly => f.write_str("WriteOnly"),
            Access::Get(_) => f.write_str("Get(..)"),
            Access::ByRef => f.write_str("ByRef"),
        }
    }
}

/// A property declared by one [`TypeInfo`].
#[derive(Clone, Copy, Debug)]
pub struct PropertyDecl {
    name: &'static str,
    visibility: Visibility,
    receiver: Receiver,
    index_arity: u8,
    access: Access,
}

impl PropertyDecl {
    /// Declares a public, readable instance property.
    #[must_use]
    pub const fn new(name: &'static str, getter: Getter) -> Self {
        Self {
            name,
            visibility: Visibility::Public,
            receiver: Receiver::Instance,
            index_arity: 0,
            access: Access::Get(getter),
        }
    }

    /// Declares a public property that can only be assigned.
    #[must_use]
    pub const fn write_only(name: &'static str) -> Self {
        Self {
            name,
            visibility: Visibility::Public,
            receiver: Receiver::Instance,
            index_arity: 0,
            access: Access::WriteOnly,
        }
    }

    /// Declares a public property that is only readable by reference.
    #[must_use]
    pub const fn by_ref(name: &'static str) -> Self {
        Self {
            name,
            visibility: Visibility::Public,
            receiver: Receiver::Instance,
            index_arity: 0,
            access: Access::ByRef,
        }
    }

    /// Declares an indexer taking `arity` index parameters.
    #[must_use]
    pub const fn indexer(name: &'static str, arity: u8, getter: Getter) -> Self {
        Self {
            name,
            visibility: Visibility::Public,
            receiver: Receiver::Instance,
            index_arity: arity,
            access: Access::Get(getter),
        }
    }

    /// Marks the property as non-public.
    #[must_use]
    pub const fn non_public(mut self) -> Self {
        self.visibility = Visibility::NonPublic;
        self
    }

    /// Marks the property as belonging to the type rather than to instances.
    #[must_use]
    pub const fn shared(mut self) -> Self {
        self.receiver = Receiver::Static;
        self
    }

    /// The declared name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The declared visibility.
    #[must_use]
    pub const fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// The declared receiver.
    #[must_use]
    pub const fn receiver(&self) -> Receiver {
        self.receiver
    }

    /// Number of index parameters; zero for ordinary properties.
    #[must_use]
    pub const fn index_arity(&self) -> u8 {
        self.index_arity
    }

    /// The access mode.
    #[must_use]
    pub const fn access(&self) -> Access {
        self.access
    }

    /// Returns `true` unless the property is write-only.
    #[must_use]
    pub const fn is_readable(&self) -> bool {
        !matches!(self.access, Access::WriteOnly)
    }
}

/// Static descriptor of a reflectable type.
///
/// Two descriptors describe the same type when their [`type_id`](Self::type_id)s
/// are equal. The `TypeId` is the one of the Rust struct that stores the
/// fields this type declares; a derived type's struct embeds its base type's
/// struct and hands it out from [`Reflect::upcast`].
pub struct TypeInfo {
    name: &'static str,
    full_name: &'static str,
    type_id: fn() -> TypeId,
    base: Option<&'static TypeInfo>,
    properties: &'static [PropertyDecl],
}

impl TypeInfo {
    /// Creates a descriptor for the struct `T` without base type or properties.
    #[must_use]
    pub const fn new<T: Any>(name: &'static str, full_name: &'static str) -> Self {
        Self {
            name,
            full_name,
            type_id: TypeId::of::<T>,
            base: None,
            properties: &[],
        }
    }

    /// Sets the base type.
    #[must_use]
    pub const fn extends(mut self, base: &'static TypeInfo) -> Self {
        self.base = Some(base);
        self
    }

    /// Sets the properties declared by this type (not by its ancestors).
    #[must_use]
    pub const fn with_properties(mut self, properties: &'static [PropertyDecl]) -> Self {
        self.properties = properties;
        self
    }

    /// The simple name, used when a shadowed property has to be qualified.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The full name, emitted as the type marker.
    #[must_use]
    pub const fn full_name(&self) -> &'static str {
        self.full_name
    }

    /// The identity of the type.
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        (self.type_id)()
    }

    /// The base type, if any.
    #[must_use]
    pub const fn base(&self) -> Option<&'static TypeInfo> {
        self.base
    }

    /// The properties declared by this type itself.
    #[must_use]
    pub const fn declared_properties(&self) -> &'static [PropertyDecl] {
        self.properties
    }

    /// Iterates over this type and then each of its ancestors, most derived
    /// first.
    #[must_use]
    pub fn ancestors(&'static self) -> Ancestors {
        Ancestors { next: Some(self) }
    }

    /// Returns `true` if `other` is a strict ancestor of this type.
    #[must_use]
    pub fn is_subclass_of(&'static self, other: &TypeInfo) -> bool {
        self.ancestors().skip(1).any(|ancestor| ancestor == other)
    }
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.type_id() == other.type_id()
    }
}

impl Eq for TypeInfo {}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInfo")
            .field("full_name", &self.full_name)
            .field("base", &self.base.map(TypeInfo::full_name))
            .field("properties", &self.properties.len())
            .finish()
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.full_name)
    }
}

/// Iterator returned by [`TypeInfo::ancestors`].
#[derive(Clone, Debug)]
pub struct Ancestors {
    next: Option<&'static TypeInfo>,
}

impl Iterator for Ancestors {
    type Item = &'static TypeInfo;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.base;
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Root;
    struct Middle;
    struct Leaf;

    fn nothing(_: &dyn Reflect) -> Result<Value, Thrown> {
        Ok(Value::Null)
    }

    static LEAF_PROPERTIES: [PropertyDecl; 3] = [
        PropertyDecl::new("Visible", nothing),
        PropertyDecl::new("Hidden", nothing).non_public(),
        PropertyDecl::indexer("Item", 1, nothing).shared(),
    ];

    static ROOT: TypeInfo = TypeInfo::new::<Root>("Root", "test::Root");
    static MIDDLE: TypeInfo = TypeInfo::new::<Middle>("Middle", "test::Middle").extends(&ROOT);
    static LEAF: TypeInfo = TypeInfo::new::<Leaf>("Leaf", "test::Leaf")
        .extends(&MIDDLE)
        .with_properties(&LEAF_PROPERTIES);

    #[test]
    fn test_ancestors_most_derived_first() {
        let names: Vec<_> = LEAF.ancestors().map(TypeInfo::name).collect();
        assert_eq!(names, ["Leaf", "Middle", "Root"]);
    }

    #[test]
    fn test_subclass_is_strict() {
        assert!(LEAF.is_subclass_of(&ROOT));
        assert!(LEAF.is_subclass_of(&MIDDLE));
        assert!(!LEAF.is_subclass_of(&LEAF));
        assert!(!ROOT.is_subclass_of(&LEAF));
    }

    #[test]
    fn test_property_flags() {
        let [visible, hidden, item] = &LEAF_PROPERTIES;
        assert_eq!(visible.visibility(), Visibility::Public);
        assert_eq!(hidden.visibility(), Visibility::NonPublic);
        assert_eq!(item.receiver(), Receiver::Static);
        assert_eq!(item.index_arity(), 1);
        assert!(PropertyDecl::by_ref("Span").is_readable());
    }

    #[test]
    fn test_type_info_identity() {
        assert_eq!(LEAF.type_id(), TypeId::of::<Leaf>());
        assert_ne!(LEAF, MIDDLE);
        assert_eq!(LEAF.to_string(), "test::Leaf");
    }
}
