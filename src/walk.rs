//! The per-value destructuring policy.

use exdetail_internals::{Obj, Shape, TaskStatus, TaskView, Value};

use crate::{
    detail::{Detail, DetailList, DetailMap},
    exceptions::Exception,
    filters::PropertyFilter,
    graph::ObjectGraph,
    reflector::PropertyReflector,
};

/// Emitted in place of a deferred query, which is never evaluated.
pub const QUERY_SKIPPED: &str = "IQueryable skipped";
/// Emitted for a cancellation token on which cancellation was requested.
pub const CANCELLATION_REQUESTED: &str = "CancellationRequested";
/// Emitted for a cancellation token on which no cancellation was requested.
pub const CANCELLATION_NOT_REQUESTED: &str = "CancellationNotRequested";

/// The label of a cancellation token's state.
#[must_use]
pub fn cancellation_label(requested: bool) -> &'static str {
    if requested {
        CANCELLATION_REQUESTED
    } else {
        CANCELLATION_NOT_REQUESTED
    }
}

/// Turns values into details, sharing one visited table for the whole call.
pub(crate) struct ValueWalker<'a> {
    reflector: &'a PropertyReflector,
    max_depth: usize,
    graph: ObjectGraph,
    filter: Option<(&'a dyn PropertyFilter, &'a dyn Exception)>,
}

impl<'a> ValueWalker<'a> {
    pub(crate) fn new(reflector: &'a PropertyReflector, max_depth: usize) -> Self {
        Self {
            reflector,
            max_depth,
            graph: ObjectGraph::new(),
            filter: None,
        }
    }

    /// Applies `filter` to the properties of every walked object, on behalf
    /// of the exception being destructured.
    pub(crate) fn with_filter(
        mut self,
        filter: &'a dyn PropertyFilter,
        exception: &'a dyn Exception,
    ) -> Self {
        self.filter = Some((filter, exception));
        self
    }

    pub(crate) fn reflector(&self) -> &'a PropertyReflector {
        self.reflector
    }

    pub(crate) fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub(crate) fn into_graph(self) -> ObjectGraph {
        self.graph
    }

    /// Destructures `value` found at nesting `level`.
    pub(crate) fn walk(&mut self, value: Value, level: usize) -> Detail {
        let object = match value {
            Value::Null => return Detail::Null,
            Value::Scalar(scalar) => return Detail::Scalar(scalar),
            Value::Object(object) => object,
        };
        if let Some(reference) = self.graph.back_reference(&object) {
            return reference;
        }

        let shape = object.shape();
        if matches!(shape, Shape::Metadata) {
            return Detail::Opaque(object.clone());
        }
        if level > self.max_depth {
            tracing::trace!(
                level,
                max_depth = self.max_depth,
                type_name = object.type_info().full_name(),
                "depth limit reached, emitting object unexpanded"
            );
            return Detail::Opaque(object.clone());
        }

        match shape {
            Shape::Map(map) => {
                let mut detail = DetailMap::anchored(self.graph.register(&object));
                for (key, value) in map.entries() {
                    let value = self.walk(value, level + 1);
                    detail.insert(key.to_key_string(), value);
                }
                Detail::Map(detail)
            }
            Shape::Deferred => Detail::from(QUERY_SKIPPED),
            Shape::Seq(seq) => {
                let mut detail = DetailList::anchored(self.graph.register(&object));
                for item in seq.items() {
                    let item = self.walk(item, level + 1);
                    detail.push(item);
                }
                Detail::List(detail)
            }
            Shape::Uri(url) => Detail::from(url.as_str()),
            Shape::Cancellation { requested } => Detail::from(cancellation_label(requested)),
            Shape::Task(task) => self.walk_task(&object, task, level),
            Shape::Object => self.walk_object(&object, level),
            Shape::Metadata => Detail::Opaque(object.clone()),
        }
    }

    fn walk_task(&mut self, object: &Obj, task: TaskView, level: usize) -> Detail {
        let mut detail = DetailMap::anchored(self.graph.register(object));
        detail.insert("Id", task.id);
        detail.insert("Status", task.status.label());
        detail.insert("CreationOptions", task.creation_options.label());
        if task.status == TaskStatus::Faulted
            && let Some(fault) = task.fault
        {
            let fault = self.walk(fault, level);
            detail.insert("Exception", fault);
        }
        Detail::Map(detail)
    }

    fn walk_object(&mut self, object: &Obj, level: usize) -> Detail {
        let mut detail = DetailMap::anchored(self.graph.register(object));
        let info = self.reflector.reflection_info(object.type_info());
        for property in info.all_properties() {
            let value = match property.read(&**object) {
                Ok(value) => self.walk(value, level + 1),
                Err(thrown) => {
                    tracing::debug!(
                        type_name = object.type_info().full_name(),
                        property = property.name(),
                        %thrown,
                        "property getter failed"
                    );
                    Detail::from(thrown.to_string())
                }
            };
            if let Some((filter, exception)) = self.filter
                && filter.should_reject(exception, property.name(), &value)
            {
                tracing::trace!(
                    type_name = object.type_info().full_name(),
                    property = property.name(),
                    "nested property rejected by filter"
                );
                continue;
            }
            detail.insert(property.name(), value);
        }
        Detail::Map(detail)
    }
}
