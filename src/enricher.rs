//! Attaching destructured exceptions to log records.

use core::fmt;
use std::{
    borrow::Cow,
    panic::{AssertUnwindSafe, catch_unwind},
};

use exdetail_internals::Thrown;
use indexmap::IndexMap;

use crate::{
    detail::{Detail, DetailMap, TYPE_KEY},
    error::ConfigError,
    exceptions::{Exception, ExceptionRef},
    options::DestructuringOptions,
    registry::DestructurerRegistry,
};

/// A log record that can carry an exception and structured properties.
pub trait LogRecord {
    /// The exception attached to the record.
    fn exception(&self) -> Option<&ExceptionRef>;

    /// Returns `true` if the record already has a property named `name`.
    fn contains_property(&self, name: &str) -> bool;

    /// Adds a structured property.
    fn add_property(&mut self, name: &str, value: Detail);
}

/// A log record kept in memory.
///
/// # Examples
///
/// ```
/// use exdetail::{
///     enricher::{LogRecord, Record},
///     exceptions::{Exception, InvalidOperationException},
/// };
///
/// let record = Record::new("request failed")
///     .with_exception(InvalidOperationException::new("bad state").into_ref())
///     .with_property("RequestId", 17);
/// assert!(record.exception().is_some());
/// assert!(record.contains_property("RequestId"));
/// ```
#[derive(Clone, Default)]
pub struct Record {
    message: Cow<'static, str>,
    exception: Option<ExceptionRef>,
    properties: IndexMap<String, Detail>,
}

impl Record {
    /// Creates a record without exception or properties.
    #[must_use]
    pub fn new(message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    /// Attaches an exception.
    #[must_use]
    pub fn with_exception(mut self, exception: ExceptionRef) -> Self {
        self.exception = Some(exception);
        self
    }

    /// Adds a property, replacing one of the same name.
    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Detail>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// The rendered message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The structured properties, in insertion order.
    #[must_use]
    pub fn properties(&self) -> &IndexMap<String, Detail> {
        &self.properties
    }

    /// The property named `name`.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Detail> {
        self.properties.get(name)
    }
}

impl LogRecord for Record {
    fn exception(&self) -> Option<&ExceptionRef> {
        self.exception.as_ref()
    }

    fn contains_property(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    fn add_property(&mut self, name: &str, value: Detail) {
        self.properties.insert(name.to_owned(), value);
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("message", &self.message)
            .field("exception", &self.exception)
            .field("properties", &self.properties)
            .finish()
    }
}

/// Adds the destructured exception of a log record to its properties.
///
/// # Examples
///
/// ```
/// use exdetail::{
///     enricher::{ExceptionEnricher, Record},
///     exceptions::{ArgumentException, Exception},
///     options::DestructuringOptions,
/// };
///
/// let enricher = ExceptionEnricher::new(&DestructuringOptions::default()).unwrap();
/// let mut record = Record::new("rejected input").with_exception(
///     ArgumentException::new("MSG")
///         .with_param_name("paramName")
///         .into_ref(),
/// );
/// enricher.enrich(&mut record);
///
/// let detail = record.property("ExceptionDetail").unwrap();
/// assert_eq!(detail.get("ParamName").and_then(|d| d.as_str()), Some("paramName"));
/// ```
pub struct ExceptionEnricher {
    registry: DestructurerRegistry,
    root_name: Cow<'static, str>,
}

impl ExceptionEnricher {
    /// Creates an enricher from validated options.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DuplicateDestructurer`] if two destructurers
    /// target the same type.
    pub fn new(options: &DestructuringOptions) -> Result<Self, ConfigError> {
        Ok(Self {
            registry: DestructurerRegistry::new(options)?,
            root_name: Cow::Owned(options.root_name().to_owned()),
        })
    }

    /// Name of the property the destructured exception is added under.
    #[must_use]
    pub fn root_name(&self) -> &str {
        &self.root_name
    }

    /// The registry used to destructure exceptions.
    #[must_use]
    pub fn registry(&self) -> &DestructurerRegistry {
        &self.registry
    }

    /// Adds the destructured exception of `record` under the root name.
    ///
    /// Does nothing when the record has no exception, already has a property
    /// under the root name, or no destructurer handles the exception.
    pub fn enrich<R: LogRecord + ?Sized>(&self, record: &mut R) {
        if record.contains_property(&self.root_name) {
            return;
        }
        let Some(exception) = record.exception() else {
            return;
        };
        if let Some(detail) = self.destructure(&**exception) {
            record.add_property(&self.root_name, Detail::Map(detail));
        }
    }

    /// Destructures `exception`, never panicking.
    ///
    /// A destructurer that panics yields a map with only `Message` and `Type`.
    /// A bag misuse yields `None`.
    #[must_use]
    pub fn destructure(&self, exception: &dyn Exception) -> Option<DetailMap> {
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            self.registry.destructure_exception(exception)
        }));
        match outcome {
            Ok(Ok(detail)) => detail,
            Ok(Err(error)) => {
                tracing::error!(
                    type_name = exception.type_info().full_name(),
                    %error,
                    "destructurer misused the properties bag"
                );
                None
            }
            Err(payload) => {
                let thrown = Thrown::from_panic(&*payload);
                tracing::warn!(
                    type_name = exception.type_info().full_name(),
                    panic = thrown.message(),
                    "destructurer panicked, emitting a minimal detail"
                );
                Some(
                    [
                        ("Message", Detail::from(exception.message().to_owned())),
                        (TYPE_KEY, Detail::from(exception.type_info().full_name())),
                    ]
                    .into_iter()
                    .collect(),
                )
            }
        }
    }
}

impl fmt::Debug for ExceptionEnricher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExceptionEnricher")
            .field("root_name", &self.root_name)
            .field("registry", &self.registry)
            .finish()
    }
}
