//! Commonly used items for convenient importing.
//!
//! ```
//! use exdetail::prelude::*;
//!
//! let exception = InvalidOperationException::new("queue is closed").into_ref();
//! let options = DestructuringOptions::builder().depth(3).build().unwrap();
//! let detail = ExceptionEnricher::new(&options)
//!     .unwrap()
//!     .destructure(&*exception)
//!     .unwrap();
//! assert_eq!(detail["Message"].as_str(), Some("queue is closed"));
//! ```

pub use crate::{
    Detail, DetailMap, Reflect, Value,
    compat::IntoException,
    destructurer::{DestructureScope, Destructurer},
    enricher::{ExceptionEnricher, LogRecord, Record},
    exceptions::{
        AggregateException, ArgumentException, ArgumentNullException,
        ArgumentOutOfRangeException, Exception, ExceptionCore, ExceptionRef,
        InvalidOperationException,
    },
    filters::PropertyFilter,
    options::DestructuringOptions,
    simple_exception,
};
