#![forbid(
    missing_docs,
    unsafe_code,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    unused_doc_comments
)]
//! Reflected object model for [`exdetail`].
//!
//! # Overview
//!
//! Rust has no runtime reflection, so the destructuring engine in
//! [`exdetail`] works against an explicit object model instead. This crate
//! defines that model:
//!
//! - **[`type_info`]**: static type descriptors
//!   - [`TypeInfo`]: name, full name, base type and declared properties of a
//!     reflectable type, built in `static`s with `const fn`s
//!   - [`PropertyDecl`]: one declared property, with its visibility, receiver,
//!     index arity and access mode
//!
//! - **[`reflect`]**: the [`Reflect`] trait implemented by every object that
//!   can appear in a destructured graph
//!
//! - **[`value`]**: erased values read from properties
//!   - [`Value`]: null, a [`Scalar`], or a shared [`Obj`]
//!   - [`Scalar`]: primitives, strings, enum labels, timestamps
//!
//! - **[`shape`]**: how an object should be walked ([`Shape`]), plus the views
//!   exposed by containers, URIs, cancellation tokens and task handles
//!
//! - **[`thrown`]**: [`Thrown`], the failure a property getter reports
//!
//! **This crate is an implementation detail.** No semantic versioning
//! guarantees are provided. Users should depend on [`exdetail`], which
//! re-exports everything needed to implement [`Reflect`].
//!
//! # Type hierarchies
//!
//! A [`TypeInfo`] may name a base type. Properties declared on a base type
//! read the base part of a derived instance through [`Reflect::upcast`], so a
//! derived struct only has to hand out the struct that stores each ancestor's
//! fields:
//!
//! ```
//! use std::any::{Any, TypeId};
//!
//! use exdetail_internals::{PropertyDecl, Reflect, Thrown, TypeInfo, Value};
//!
//! struct Shape {
//!     sides: u32,
//! }
//!
//! struct Square {
//!     base: Shape,
//!     side: f64,
//! }
//!
//! fn sides(this: &dyn Reflect) -> Result<Value, Thrown> {
//!     Ok(this.part::<Shape>()?.sides.into())
//! }
//!
//! fn side(this: &dyn Reflect) -> Result<Value, Thrown> {
//!     Ok(this.part::<Square>()?.side.into())
//! }
//!
//! static SHAPE_PROPERTIES: [PropertyDecl; 1] = [PropertyDecl::new("Sides", sides)];
//! static SHAPE: TypeInfo =
//!     TypeInfo::new::<Shape>("Shape", "geometry::Shape").with_properties(&SHAPE_PROPERTIES);
//!
//! static SQUARE_PROPERTIES: [PropertyDecl; 1] = [PropertyDecl::new("Side", side)];
//! static SQUARE: TypeInfo = TypeInfo::new::<Square>("Square", "geometry::Square")
//!     .extends(&SHAPE)
//!     .with_properties(&SQUARE_PROPERTIES);
//!
//! impl Reflect for Shape {
//!     fn type_info(&self) -> &'static TypeInfo {
//!         &SHAPE
//!     }
//!
//!     fn as_any(&self) -> &dyn Any {
//!         self
//!     }
//! }
//!
//! impl Reflect for Square {
//!     fn type_info(&self) -> &'static TypeInfo {
//!         &SQUARE
//!     }
//!
//!     fn as_any(&self) -> &dyn Any {
//!         self
//!     }
//!
//!     fn upcast(&self, type_id: TypeId) -> Option<&dyn Any> {
//!         if type_id == TypeId::of::<Self>() {
//!             Some(self)
//!         } else {
//!             self.base.upcast(type_id)
//!         }
//!     }
//! }
//!
//! let square = Square {
//!     base: Shape { sides: 4 },
//!     side: 2.5,
//! };
//! let erased: &dyn Reflect = &square;
//! assert_eq!(sides(erased).unwrap(), Value::from(4u32));
//! assert!(SQUARE.is_subclass_of(&SHAPE));
//! ```
//!
//! [`exdetail`]: https://docs.rs/exdetail/latest/exdetail/

pub mod reflect;
pub mod shape;
pub mod thrown;
pub mod type_info;
pub mod value;

pub use reflect::Reflect;
pub use shape::{MapView, SeqView, Shape, TaskCreationOptions, TaskStatus, TaskView};
pub use thrown::Thrown;
pub use type_info::{Access, Ancestors, Getter, PropertyDecl, Receiver, TypeInfo, Visibility};
pub use value::{Obj, Scalar, Value};
