use core::{
    any::Any,
    sync::atomic::{AtomicBool, Ordering},
};

use exdetail_internals::{Reflect, Shape, TypeInfo};

/// Type descriptor of [`CancellationToken`].
pub static CANCELLATION_TOKEN: TypeInfo = TypeInfo::new::<CancellationToken>(
    "CancellationToken",
    concat!(module_path!(), "::CancellationToken"),
);

/// A cooperative cancellation signal.
///
/// Only whether cancellation was requested is ever logged.
#[derive(Debug, Default)]
pub struct CancellationToken {
    requested: AtomicBool,
}

impl CancellationToken {
    /// Creates a token with no cancellation requested.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a token that is already cancelled.
    #[must_use]
    pub fn cancelled() -> Self {
        Self {
            requested: AtomicBool::new(true),
        }
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.requested.store(true, Ordering::Release);
    }

    /// Returns `true` once cancellation was requested.
    #[must_use]
    pub fn is_cancellation_requested(&self) -> bool {
        self.requested.load(Ordering::Acquire)
    }
}

impl Reflect for CancellationToken {
    fn type_info(&self) -> &'static TypeInfo {
        &CANCELLATION_TOKEN
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn shape(&self) -> Shape<'_> {
        Shape::Cancellation {
            requested: self.is_cancellation_requested(),
        }
    }
}
