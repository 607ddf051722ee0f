use std::{borrow::Cow, sync::Arc};

use exdetail_internals::{PropertyDecl, Reflect, Thrown, TypeInfo, Value};

use super::{ExceptionCore, SYSTEM_EXCEPTION, SystemException};
use crate::objects::{CancellationToken, TaskHandle};

static OPERATION_CANCELED_EXCEPTION_PROPERTIES: [PropertyDecl; 1] =
    [PropertyDecl::new("CancellationToken", cancellation_token)];

/// Type descriptor of [`OperationCanceledException`].
pub static OPERATION_CANCELED_EXCEPTION: TypeInfo =
    TypeInfo::new::<OperationCanceledException>(
        "OperationCanceledException",
        concat!(module_path!(), "::OperationCanceledException"),
    )
    .extends(&SYSTEM_EXCEPTION)
    .with_properties(&OPERATION_CANCELED_EXCEPTION_PROPERTIES);

static TASK_CANCELED_EXCEPTION_PROPERTIES: [PropertyDecl; 1] =
    [PropertyDecl::new("Task", task)];

/// Type descriptor of [`TaskCanceledException`].
pub static TASK_CANCELED_EXCEPTION: TypeInfo = TypeInfo::new::<TaskCanceledException>(
    "TaskCanceledException",
    concat!(module_path!(), "::TaskCanceledException"),
)
.extends(&OPERATION_CANCELED_EXCEPTION)
.with_properties(&TASK_CANCELED_EXCEPTION_PROPERTIES);

fn cancellation_token(this: &dyn Reflect) -> Result<Value, Thrown> {
    Ok(Value::shared(
        &this.part::<OperationCanceledException>()?.cancellation_token,
    ))
}

fn task(this: &dyn Reflect) -> Result<Value, Thrown> {
    Ok(this
        .part::<TaskCanceledException>()?
        .task
        .as_ref()
        .map_or(Value::Null, Value::shared))
}

/// An operation was cancelled.
pub struct OperationCanceledException {
    base: SystemException,
    cancellation_token: Arc<CancellationToken>,
}

impl OperationCanceledException {
    /// The message used when none is given.
    pub const DEFAULT_MESSAGE: &'static str = "The operation was canceled.";

    /// Creates the exception with the given message and a token on which
    /// no cancellation was requested.
    #[must_use]
    pub fn new(message: impl Into<Cow<'static, str>>) -> Self {
        Self::from(ExceptionCore::new(message))
    }

    /// Sets the token the cancellation was observed on.
    #[must_use]
    pub fn with_cancellation_token(mut self, token: Arc<CancellationToken>) -> Self {
        self.cancellation_token = token;
        self
    }

    /// The token the cancellation was observed on.
    #[must_use]
    pub fn cancellation_token(&self) -> &Arc<CancellationToken> {
        &self.cancellation_token
    }
}

impl Default for OperationCanceledException {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MESSAGE)
    }
}

impl From<ExceptionCore> for OperationCanceledException {
    fn from(core: ExceptionCore) -> Self {
        Self {
            base: SystemException::from(core),
            cancellation_token: Arc::new(CancellationToken::new()),
        }
    }
}

crate::__impl_exception!(OperationCanceledException, OPERATION_CANCELED_EXCEPTION);

/// A task was cancelled.
pub struct TaskCanceledException {
    base: OperationCanceledException,
    task: Option<Arc<TaskHandle>>,
}

impl TaskCanceledException {
    /// The message used when none is given.
    pub const DEFAULT_MESSAGE: &'static str = "A task was canceled.";

    /// Creates the exception with the given message and no task.
    #[must_use]
    pub fn new(message: impl Into<Cow<'static, str>>) -> Self {
        Self::from(ExceptionCore::new(message))
    }

    /// Creates the exception for the cancelled `task`.
    #[must_use]
    pub fn for_task(task: Arc<TaskHandle>) -> Self {
        Self {
            task: Some(task),
            ..Self::default()
        }
    }

    /// Sets the token the cancellation was observed on.
    #[must_use]
    pub fn with_cancellation_token(mut self, token: Arc<CancellationToken>) -> Self {
        self.base = self.base.with_cancellation_token(token);
        self
    }

    /// The token the cancellation was observed on.
    #[must_use]
    pub fn cancellation_token(&self) -> &Arc<CancellationToken> {
        self.base.cancellation_token()
    }

    /// The cancelled task, if known.
    #[must_use]
    pub fn task(&self) -> Option<&Arc<TaskHandle>> {
        self.task.as_ref()
    }
}

impl Default for TaskCanceledException {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MESSAGE)
    }
}

impl From<ExceptionCore> for TaskCanceledException {
    fn from(core: ExceptionCore) -> Self {
        Self {
            base: OperationCanceledException::from(core),
            task: None,
        }
    }
}

crate::__impl_exception!(TaskCanceledException, TASK_CANCELED_EXCEPTION);
