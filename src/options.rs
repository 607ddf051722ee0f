//! Configuration of the engine.

use core::fmt;
use std::{borrow::Cow, sync::Arc};

use crate::{
    destructurer::Destructurer,
    destructurers::default_destructurers,
    error::ConfigError,
    filters::PropertyFilter,
    registry::index_destructurers,
};

/// Name of the log property holding the destructured exception by default.
pub const DEFAULT_ROOT_NAME: &str = "ExceptionDetail";

/// Nesting level beyond which objects are emitted unexpanded by default.
pub const DEFAULT_DEPTH: usize = 10;

/// Validated configuration of the engine.
///
/// Built with [`DestructuringOptions::builder`]; the [`Default`] value is the
/// builder's defaults.
#[derive(Clone)]
pub struct DestructuringOptions {
    root_name: Cow<'static, str>,
    depth: usize,
    destructurers: Vec<Arc<dyn Destructurer>>,
    filter: Option<Arc<dyn PropertyFilter>>,
    reflection_based_destructurer: bool,
}

impl DestructuringOptions {
    /// Starts from the defaults: root name [`DEFAULT_ROOT_NAME`], depth
    /// [`DEFAULT_DEPTH`], the [default
    /// destructurers](crate::destructurers::default_destructurers), no filter
    /// and the reflection-based fallback enabled.
    #[must_use]
    pub fn builder() -> DestructuringOptionsBuilder {
        DestructuringOptionsBuilder {
            options: Self::default(),
        }
    }

    /// Name of the log property holding the destructured exception.
    #[must_use]
    pub fn root_name(&self) -> &str {
        &self.root_name
    }

    /// Nesting level beyond which objects are emitted unexpanded.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The type-specific destructurers, in registration order.
    #[must_use]
    pub fn destructurers(&self) -> &[Arc<dyn Destructurer>] {
        &self.destructurers
    }

    /// The property filter.
    #[must_use]
    pub fn filter(&self) -> Option<&Arc<dyn PropertyFilter>> {
        self.filter.as_ref()
    }

    /// Whether types without a destructurer are reflected.
    #[must_use]
    pub fn is_reflection_based_destructurer_enabled(&self) -> bool {
        self.reflection_based_destructurer
    }
}

impl Default for DestructuringOptions {
    fn default() -> Self {
        Self {
            root_name: Cow::Borrowed(DEFAULT_ROOT_NAME),
            depth: DEFAULT_DEPTH,
            destructurers: default_destructurers(),
            filter: None,
            reflection_based_destructurer: true,
        }
    }
}

impl fmt::Debug for DestructuringOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DestructuringOptions")
            .field("root_name", &self.root_name)
            .field("depth", &self.depth)
            .field("destructurers", &self.destructurers)
            .field("filter", &self.filter.is_some())
            .field(
                "reflection_based_destructurer",
                &self.reflection_based_destructurer,
            )
            .finish()
    }
}

/// Builder of [`DestructuringOptions`].
///
/// # Examples
///
/// ```
/// use exdetail::{filters::ignore_stack_trace_and_target_site, options::DestructuringOptions};
///
/// let options = DestructuringOptions::builder()
///     .root_name("Error")
///     .depth(4)
///     .filter(ignore_stack_trace_and_target_site())
///     .build()
///     .unwrap();
/// assert_eq!(options.root_name(), "Error");
/// ```
#[derive(Clone, Debug)]
pub struct DestructuringOptionsBuilder {
    options: DestructuringOptions,
}

impl DestructuringOptionsBuilder {
    /// Sets the name of the log property holding the destructured exception.
    #[must_use]
    pub fn root_name(mut self, root_name: impl Into<Cow<'static, str>>) -> Self {
        self.options.root_name = root_name.into();
        self
    }

    /// Sets the nesting level beyond which objects are emitted unexpanded.
    /// The properties of the exception itself are at level 1.
    #[must_use]
    pub fn depth(mut self, depth: usize) -> Self {
        self.options.depth = depth;
        self
    }

    /// Registers a destructurer after the ones registered so far.
    #[must_use]
    pub fn destructurer(mut self, destructurer: impl Destructurer) -> Self {
        self.options.destructurers.push(Arc::new(destructurer));
        self
    }

    /// Registers shared destructurers after the ones registered so far.
    #[must_use]
    pub fn destructurers(
        mut self,
        destructurers: impl IntoIterator<Item = Arc<dyn Destructurer>>,
    ) -> Self {
        self.options.destructurers.extend(destructurers);
        self
    }

    /// Removes every destructurer registered so far, the defaults included.
    #[must_use]
    pub fn clear_destructurers(mut self) -> Self {
        self.options.destructurers.clear();
        self
    }

    /// Sets the property filter.
    #[must_use]
    pub fn filter(mut self, filter: impl PropertyFilter) -> Self {
        self.options.filter = Some(Arc::new(filter));
        self
    }

    /// Sets a shared property filter.
    #[must_use]
    pub fn shared_filter(mut self, filter: Arc<dyn PropertyFilter>) -> Self {
        self.options.filter = Some(filter);
        self
    }

    /// Leaves exceptions without a destructurer out of the log record instead
    /// of reflecting their properties.
    #[must_use]
    pub fn disable_reflection_based_destructurer(mut self) -> Self {
        self.options.reflection_based_destructurer = false;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::EmptyRootName`] if the root name is empty
    /// - [`ConfigError::InvalidDepth`] if the depth is zero
    /// - [`ConfigError::DuplicateDestructurer`] if two destructurers target
    ///   the same type
    pub fn build(self) -> Result<DestructuringOptions, ConfigError> {
        let options = self.options;
        if options.root_name.is_empty() {
            return Err(ConfigError::EmptyRootName);
        }
        if options.depth == 0 {
            return Err(ConfigError::InvalidDepth(options.depth));
        }
        index_destructurers(&options.destructurers)?;
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::destructurers::ExceptionDestructurer;

    #[test]
    fn test_defaults() {
        let options = DestructuringOptions::builder().build().unwrap();
        assert_eq!(options.root_name(), DEFAULT_ROOT_NAME);
        assert_eq!(options.depth(), 10);
        assert_eq!(options.destructurers().len(), 8);
        assert!(options.filter().is_none());
        assert!(options.is_reflection_based_destructurer_enabled());
    }

    #[test]
    fn test_validation() {
        assert_eq!(
            DestructuringOptions::builder().root_name("").build().unwrap_err(),
            ConfigError::EmptyRootName
        );
        assert_eq!(
            DestructuringOptions::builder().depth(0).build().unwrap_err(),
            ConfigError::InvalidDepth(0)
        );
        assert!(matches!(
            DestructuringOptions::builder()
                .destructurer(ExceptionDestructurer)
                .build()
                .unwrap_err(),
            ConfigError::DuplicateDestructurer { .. }
        ));
    }
}
