//! Filters that keep properties out of the output.
//!
//! A filter sees every property before it is stored, together with the
//! exception it belongs to, and decides whether to drop it.
//!
//! ```
//! use exdetail::filters::{
//!     CompositeFilter, IgnorePropertyByName, PropertyFilter, ignore_stack_trace_and_target_site,
//! };
//!
//! let filter = CompositeFilter::new([
//!     ignore_stack_trace_and_target_site().into_shared(),
//!     IgnorePropertyByName::new(["HelpLink"]).unwrap().into_shared(),
//! ])
//! .unwrap();
//! # let _ = filter;
//! ```

use core::fmt;
use std::{borrow::Cow, sync::Arc};

use crate::{detail::Detail, error::ConfigError, exceptions::Exception};

/// Decides which properties are dropped.
///
/// Implemented for closures taking the same arguments as
/// [`should_reject`](Self::should_reject).
pub trait PropertyFilter: Send + Sync + 'static {
    /// Returns `true` to drop the property `name` of `exception`.
    fn should_reject(&self, exception: &dyn Exception, name: &str, value: &Detail) -> bool;

    /// Moves the filter into a shared allocation.
    fn into_shared(self) -> Arc<dyn PropertyFilter>
    where
        Self: Sized,
    {
        Arc::new(self)
    }
}

impl<F> PropertyFilter for F
where
    F: Fn(&dyn Exception, &str, &Detail) -> bool + Send + Sync + 'static,
{
    fn should_reject(&self, exception: &dyn Exception, name: &str, value: &Detail) -> bool {
        self(exception, name, value)
    }
}

/// Drops properties by exact, case-sensitive name, whatever the exception.
#[derive(Clone, Debug)]
pub struct IgnorePropertyByName {
    names: Vec<Cow<'static, str>>,
}

impl IgnorePropertyByName {
    /// Creates a filter dropping every property named in `names`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyIgnoreList`] if `names` is empty.
    pub fn new<I>(names: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator,
        I::Item: Into<Cow<'static, str>>,
    {
        let names: Vec<_> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(ConfigError::EmptyIgnoreList);
        }
        Ok(Self { names })
    }

    /// The ignored names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(|name| &**name)
    }
}

impl PropertyFilter for IgnorePropertyByName {
    fn should_reject(&self, _exception: &dyn Exception, name: &str, _value: &Detail) -> bool {
        self.names.iter().any(|ignored| ignored == name)
    }
}

/// Drops a property if any of its filters does. Filters run in order and stop
/// at the first rejection.
#[derive(Clone)]
pub struct CompositeFilter {
    filters: Vec<Arc<dyn PropertyFilter>>,
}

impl CompositeFilter {
    /// Combines `filters`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyFilterChain`] if `filters` is empty.
    pub fn new(
        filters: impl IntoIterator<Item = Arc<dyn PropertyFilter>>,
    ) -> Result<Self, ConfigError> {
        let filters: Vec<_> = filters.into_iter().collect();
        if filters.is_empty() {
            return Err(ConfigError::EmptyFilterChain);
        }
        Ok(Self { filters })
    }

    /// Number of combined filters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Always `false`: a composite filter holds at least one filter.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl PropertyFilter for CompositeFilter {
    fn should_reject(&self, exception: &dyn Exception, name: &str, value: &Detail) -> bool {
        self.filters
            .iter()
            .any(|filter| filter.should_reject(exception, name, value))
    }
}

impl fmt::Debug for CompositeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeFilter")
            .field("filters", &self.filters.len())
            .finish()
    }
}

/// Drops `StackTrace` and `TargetSite`, which are large and rarely useful in
/// aggregated logs.
#[must_use]
pub fn ignore_stack_trace_and_target_site() -> IgnorePropertyByName {
    IgnorePropertyByName {
        names: vec![Cow::Borrowed("StackTrace"), Cow::Borrowed("TargetSite")],
    }
}
