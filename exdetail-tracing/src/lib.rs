#![deny(
    missing_docs,
    unsafe_code,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]

//! Destructured exceptions as [`tracing`] events.
//!
//! [`TracingEnricher`] runs an [`ExceptionEnricher`] on an exception and emits
//! one event carrying the result:
//!
//! | field | value |
//! |-------|-------|
//! | `exception.type` | full name of the exception type |
//! | `exception.properties` | the structured properties as a JSON object |
//! | `message` | the log message |
//!
//! Any subscriber receives these as ordinary string fields, so JSON log
//! pipelines can index the exception without knowing about this crate.
//!
//! # Quick Start
//!
//! ```
//! use exdetail::{
//!     exceptions::{Exception, InvalidOperationException},
//!     options::DestructuringOptions,
//! };
//! use exdetail_tracing::{ExceptionResultExt, TracingEnricher};
//!
//! let enricher = TracingEnricher::new(&DestructuringOptions::default()).unwrap();
//!
//! // Emit an event for an exception directly
//! let exception = InvalidOperationException::new("queue is closed").into_ref();
//! enricher.emit(tracing::Level::WARN, "dropping message", &exception);
//!
//! // Or log the error side of a result and keep going
//! let result: Result<u32, _> = Err(exception);
//! let result = result.log_exception(&enricher, "dequeue failed");
//! assert!(result.is_err());
//! ```
//!
//! # Environment Variable Configuration
//!
//! `EXDETAIL_TRACING` takes a comma-separated list of flags, read once:
//!
//! - `pretty`: pretty-print the `exception.properties` JSON
//!
//! ```bash
//! EXDETAIL_TRACING=pretty cargo run
//! ```

use std::sync::OnceLock;

use exdetail::{
    enricher::{ExceptionEnricher, Record},
    error::ConfigError,
    exceptions::ExceptionRef,
    options::DestructuringOptions,
};
use tracing::Level;

#[derive(Debug)]
struct ExdetailTracingEnvOptions {
    pretty: bool,
}

impl ExdetailTracingEnvOptions {
    fn get() -> &'static Self {
        static EXDETAIL_TRACING_FLAGS: OnceLock<ExdetailTracingEnvOptions> = OnceLock::new();

        EXDETAIL_TRACING_FLAGS.get_or_init(|| {
            let mut pretty = false;

            if let Some(var) = std::env::var_os("EXDETAIL_TRACING") {
                for v in var.to_string_lossy().split(',') {
                    if v.trim().eq_ignore_ascii_case("pretty") {
                        pretty = true;
                    }
                }
            }

            ExdetailTracingEnvOptions { pretty }
        })
    }
}

/// Emits destructured exceptions as `tracing` events.
#[derive(Debug)]
pub struct TracingEnricher {
    enricher: ExceptionEnricher,
    pretty: bool,
}

impl TracingEnricher {
    /// Creates an emitter from validated options.
    ///
    /// JSON is pretty-printed when the `EXDETAIL_TRACING` environment variable
    /// contains `pretty`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DuplicateDestructurer`] if two destructurers
    /// target the same type.
    pub fn new(options: &DestructuringOptions) -> Result<Self, ConfigError> {
        Ok(Self {
            enricher: ExceptionEnricher::new(options)?,
            pretty: ExdetailTracingEnvOptions::get().pretty,
        })
    }

    /// Overrides whether JSON is pretty-printed.
    #[must_use]
    pub fn with_pretty_json(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// The wrapped enricher.
    #[must_use]
    pub fn enricher(&self) -> &ExceptionEnricher {
        &self.enricher
    }

    /// Renders the structured properties an enriched record would carry for
    /// `exception`, as a JSON object.
    #[must_use]
    pub fn render(&self, exception: &ExceptionRef) -> String {
        let mut record = Record::new("").with_exception(exception.clone());
        self.enricher.enrich(&mut record);

        let properties: serde_json::Map<String, serde_json::Value> = record
            .properties()
            .iter()
            .map(|(name, detail)| {
                let value = serde_json::to_value(detail).unwrap_or_else(|error| {
                    tracing::error!(%error, property = name.as_str(), "could not serialize property");
                    serde_json::Value::Null
                });
                (name.clone(), value)
            })
            .collect();
        let properties = serde_json::Value::Object(properties);

        let rendered = if self.pretty {
            serde_json::to_string_pretty(&properties)
        } else {
            serde_json::to_string(&properties)
        };
        rendered.unwrap_or_else(|error| {
            tracing::error!(%error, "could not render exception properties");
            String::from("{}")
        })
    }

    /// Emits one event at `level` for `exception`.
    pub fn emit(&self, level: Level, message: &str, exception: &ExceptionRef) {
        let exception_type = exception.type_info().full_name();
        let properties = self.render(exception);
        let properties = properties.as_str();

        macro_rules! emit_at {
            ($level:expr) => {
                tracing::event!(
                    $level,
                    "exception.type" = exception_type,
                    "exception.properties" = properties,
                    "{message}"
                )
            };
        }

        if level == Level::ERROR {
            emit_at!(Level::ERROR);
        } else if level == Level::WARN {
            emit_at!(Level::WARN);
        } else if level == Level::INFO {
            emit_at!(Level::INFO);
        } else if level == Level::DEBUG {
            emit_at!(Level::DEBUG);
        } else {
            emit_at!(Level::TRACE);
        }
    }
}

/// Logging the error side of a `Result`.
pub trait ExceptionResultExt {
    /// Emits an error-level event for the exception, if any, and returns the
    /// result unchanged.
    #[must_use]
    fn log_exception(self, enricher: &TracingEnricher, message: &str) -> Self;
}

impl<T> ExceptionResultExt for Result<T, ExceptionRef> {
    fn log_exception(self, enricher: &TracingEnricher, message: &str) -> Self {
        if let Err(exception) = &self {
            enricher.emit(Level::ERROR, message, exception);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use exdetail::exceptions::{ArgumentException, Exception, ExceptionCore};
    use tracing::{
        Event, Subscriber,
        field::{Field, Visit},
    };
    use tracing_subscriber::{
        Layer, Registry,
        layer::{Context, SubscriberExt},
    };

    use super::*;

    #[derive(Debug, Default)]
    struct CapturedEvent {
        level: Option<Level>,
        fields: Vec<(String, String)>,
    }

    impl CapturedEvent {
        fn field(&self, name: &str) -> Option<&str> {
            self.fields
                .iter()
                .find(|(field, _)| field == name)
                .map(|(_, value)| value.as_str())
        }
    }

    impl Visit for CapturedEvent {
        fn record_str(&mut self, field: &Field, value: &str) {
            self.fields.push((field.name().to_owned(), value.to_owned()));
        }

        fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
            self.fields
                .push((field.name().to_owned(), format!("{value:?}")));
        }
    }

    #[derive(Clone, Default)]
    struct CaptureLayer(Arc<Mutex<Vec<CapturedEvent>>>);

    impl<S: Subscriber> Layer<S> for CaptureLayer {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let mut captured = CapturedEvent {
                level: Some(*event.metadata().level()),
                ..CapturedEvent::default()
            };
            event.record(&mut captured);
            self.0.lock().unwrap().push(captured);
        }
    }

    fn capture(f: impl FnOnce()) -> Vec<CapturedEvent> {
        let layer = CaptureLayer::default();
        let subscriber = Registry::default().with(layer.clone());
        tracing::subscriber::with_default(subscriber, f);
        let mut events = layer.0.lock().unwrap();
        std::mem::take(&mut *events)
    }

    fn enricher() -> TracingEnricher {
        TracingEnricher::new(&DestructuringOptions::default())
            .unwrap()
            .with_pretty_json(false)
    }

    #[test]
    fn test_emit_fields() {
        let enricher = enricher();
        let exception = ArgumentException::new("MSG")
            .with_param_name("paramName")
            .into_ref();
        let events = capture(|| enricher.emit(Level::WARN, "bad input", &exception));

        let event = events
            .iter()
            .find(|event| event.field("exception.type").is_some())
            .unwrap();
        assert_eq!(event.level, Some(Level::WARN));
        assert_eq!(
            event.field("exception.type"),
            Some("exdetail::exceptions::argument::ArgumentException")
        );

        let properties: serde_json::Value =
            serde_json::from_str(event.field("exception.properties").unwrap()).unwrap();
        assert_eq!(properties["ExceptionDetail"]["ParamName"], "paramName");
        assert_eq!(properties["ExceptionDetail"]["Message"], "MSG");
    }

    #[test]
    fn test_log_exception_passes_result_through() {
        let enricher = enricher();
        let ok: Result<u8, ExceptionRef> = Ok(1);
        let events = capture(|| {
            assert_eq!(ok.log_exception(&enricher, "unused").ok(), Some(1));
        });
        assert!(events.is_empty());

        let failed: Result<u8, ExceptionRef> = Err(ExceptionCore::new("m").into_ref());
        let events = capture(|| {
            assert!(failed.log_exception(&enricher, "failed").is_err());
        });
        let event = events
            .iter()
            .find(|event| event.field("exception.type").is_some())
            .unwrap();
        assert_eq!(event.level, Some(Level::ERROR));
    }

    #[test]
    fn test_pretty_rendering() {
        let exception = ExceptionCore::new("m").into_ref();
        let compact = enricher().render(&exception);
        let pretty = enricher().with_pretty_json(true).render(&exception);

        assert!(!compact.contains('\n'));
        assert!(pretty.contains('\n'));
        assert_eq!(
            serde_json::from_str::<serde_json::Value>(&compact).unwrap(),
            serde_json::from_str::<serde_json::Value>(&pretty).unwrap()
        );
    }
}
