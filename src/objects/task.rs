use core::any::Any;

use exdetail_internals::{
    Obj, Reflect, Shape, TaskCreationOptions, TaskStatus, TaskView, TypeInfo, Value,
};

use crate::exceptions::ExceptionRef;

/// Type descriptor of [`TaskHandle`].
pub static TASK_HANDLE: TypeInfo =
    TypeInfo::new::<TaskHandle>("Task", concat!(module_path!(), "::Task"));

/// A snapshot of an asynchronous task.
///
/// The engine records the task's identifier, status and creation options and,
/// when the task faulted, the exception it faulted with. It never waits for
/// the task.
#[derive(Clone)]
pub struct TaskHandle {
    id: u64,
    status: TaskStatus,
    creation_options: TaskCreationOptions,
    fault: Option<ExceptionRef>,
}

impl TaskHandle {
    /// Creates a handle for a task in the given state.
    #[must_use]
    pub fn new(id: u64, status: TaskStatus) -> Self {
        Self {
            id,
            status,
            creation_options: TaskCreationOptions::NONE,
            fault: None,
        }
    }

    /// Creates a handle for a task that faulted with `exception`.
    #[must_use]
    pub fn faulted(id: u64, exception: ExceptionRef) -> Self {
        Self {
            fault: Some(exception),
            ..Self::new(id, TaskStatus::Faulted)
        }
    }

    /// Creates a handle for a cancelled task.
    #[must_use]
    pub fn canceled(id: u64) -> Self {
        Self::new(id, TaskStatus::Canceled)
    }

    /// Sets the creation options.
    #[must_use]
    pub fn with_creation_options(mut self, creation_options: TaskCreationOptions) -> Self {
        self.creation_options = creation_options;
        self
    }

    /// Task identifier.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Task status.
    #[must_use]
    pub fn status(&self) -> TaskStatus {
        self.status
    }

    /// Options the task was created with.
    #[must_use]
    pub fn creation_options(&self) -> TaskCreationOptions {
        self.creation_options
    }

    /// The exception the task faulted with.
    #[must_use]
    pub fn exception(&self) -> Option<&ExceptionRef> {
        self.fault.as_ref()
    }
}

impl Reflect for TaskHandle {
    fn type_info(&self) -> &'static TypeInfo {
        &TASK_HANDLE
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn shape(&self) -> Shape<'_> {
        Shape::Task(TaskView {
            id: self.id,
            status: self.status,
            creation_options: self.creation_options,
            fault: self.fault.clone().map(|exception| {
                let exception: Obj = exception;
                Value::Object(exception)
            }),
        })
    }
}
