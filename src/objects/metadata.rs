use core::{any::Any, fmt};

use exdetail_internals::{Reflect, Shape, TypeInfo};

/// Type descriptor of [`TypeHandle`].
pub static TYPE_HANDLE: TypeInfo =
    TypeInfo::new::<TypeHandle>("Type", concat!(module_path!(), "::Type"));

/// Type descriptor of [`MemberHandle`].
pub static MEMBER_HANDLE: TypeInfo =
    TypeInfo::new::<MemberHandle>("MemberInfo", concat!(module_path!(), "::MemberInfo"));

/// A reference to a reflected type.
///
/// Type handles are metadata: they are emitted as they are, never walked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TypeHandle(&'static TypeInfo);

impl TypeHandle {
    /// Creates a handle to `ty`.
    #[must_use]
    pub const fn new(ty: &'static TypeInfo) -> Self {
        Self(ty)
    }

    /// The referenced type.
    #[must_use]
    pub const fn type_info_of(&self) -> &'static TypeInfo {
        self.0
    }
}

impl Reflect for TypeHandle {
    fn type_info(&self) -> &'static TypeInfo {
        &TYPE_HANDLE
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn shape(&self) -> Shape<'_> {
        Shape::Metadata
    }

    fn describe(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.full_name())
    }
}

/// A reference to a member of a reflected type, such as the function an
/// exception was raised in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemberHandle {
    declaring_type: &'static TypeInfo,
    name: &'static str,
}

impl MemberHandle {
    /// Creates a handle to the member `name` of `declaring_type`.
    #[must_use]
    pub const fn new(declaring_type: &'static TypeInfo, name: &'static str) -> Self {
        Self {
            declaring_type,
            name,
        }
    }

    /// The type declaring the member.
    #[must_use]
    pub const fn declaring_type(&self) -> &'static TypeInfo {
        self.declaring_type
    }

    /// The member name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl Reflect for MemberHandle {
    fn type_info(&self) -> &'static TypeInfo {
        &MEMBER_HANDLE
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn shape(&self) -> Shape<'_> {
        Shape::Metadata
    }

    fn describe(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.declaring_type.full_name(), self.name)
    }
}
