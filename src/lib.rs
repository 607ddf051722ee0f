#![deny(
    missing_docs,
    clippy::missing_safety_doc,
    clippy::undocumented_unsafe_blocks,
    clippy::as_ptr_cast_mut,
    clippy::ptr_as_ptr,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
// Extra checks on nightly
#![cfg_attr(nightly_extra_checks, feature(rustdoc_missing_doc_code_examples))]
#![cfg_attr(nightly_extra_checks, forbid(rustdoc::missing_doc_code_examples))]
// Make docs.rs generate better docs
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Turns exception object graphs into bounded, cycle-safe structured log data.
//!
//! ## Overview
//!
//! An exception is more than its message: it carries a parameter name, an
//! error code, the inner exceptions that caused it, a dictionary of extra
//! data. Logged as text, all of that is flattened into one string. This crate
//! walks the exception instead and produces a [`Detail`] tree, a map of plain
//! values that structured log sinks can index and query.
//!
//! The walk is safe on arbitrary graphs:
//! - objects nested deeper than the configured depth are emitted unexpanded
//! - an object reached twice is emitted once, then referenced as
//!   `{"$ref": id}`, so cycles terminate
//! - a property getter that fails or panics becomes the string
//!   `threw {Type}: {Message}`, and its siblings are still emitted
//!
//! ## Quick Example
//!
//! ```
//! use exdetail::prelude::*;
//!
//! let enricher = ExceptionEnricher::new(&DestructuringOptions::default()).unwrap();
//! let mut record = Record::new("could not save the order").with_exception(
//!     ArgumentException::new("MSG")
//!         .with_param_name("paramName")
//!         .into_ref(),
//! );
//! enricher.enrich(&mut record);
//!
//! let detail = record.property("ExceptionDetail").unwrap();
//! assert_eq!(detail.get("Message").and_then(Detail::as_str), Some("MSG"));
//! assert_eq!(detail.get("ParamName").and_then(Detail::as_str), Some("paramName"));
//! ```
//!
//! ## Core Concepts
//!
//! - **Exceptions** ([`exceptions`]) are structs that embed their base type's
//!   struct, down to [`ExceptionCore`](exceptions::ExceptionCore). Their
//!   properties are declared in static [`TypeInfo`]s, which is what the
//!   reflection-based destructurer reads.
//! - **Destructurers** ([`destructurer`], [`destructurers`]) write the
//!   properties of one or more exception types into a
//!   [`PropertiesBag`](bag::PropertiesBag). The
//!   [`registry`] picks the destructurer by exact runtime type and falls back
//!   to reflection.
//! - **Filters** ([`filters`]) drop properties before they reach the bag.
//! - **The enricher** ([`enricher`]) attaches the result to a log record.
//!   The `exdetail-tracing` crate does the same for `tracing` events.
//!
//! The reflected object model itself lives in [`exdetail-internals`] and is
//! re-exported here.
//!
//! [`exdetail-internals`]: exdetail_internals
//!
//! ## Feature Flags
//!
//! - `serde`: serializes [`Detail`] trees
//! - `backtrace`: captures stack traces into exceptions
//! - `compat-anyhow1`: converts `anyhow` errors into exceptions

#[macro_use]
mod macros;

pub mod bag;
pub mod compat;
pub mod destructurer;
pub mod destructurers;
pub mod detail;
pub mod enricher;
pub mod error;
pub mod exceptions;
pub mod filters;
mod graph;
pub mod objects;
pub mod options;
pub mod prelude;
pub mod reflector;
pub mod registry;
pub mod walk;

pub use exdetail_internals::{
    Access, Getter, MapView, Obj, PropertyDecl, Receiver, Reflect, Scalar, SeqView, Shape,
    TaskCreationOptions, TaskStatus, TaskView, Thrown, TypeInfo, Value, Visibility,
};

pub use self::detail::{Detail, DetailList, DetailMap};

// Not public API. Referenced by macro-generated code.
#[doc(hidden)]
pub mod __private {
    #[doc(hidden)]
    pub use std::borrow::Cow;
}
