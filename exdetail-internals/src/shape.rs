//! How an object is walked.

use core::{fmt, ops::BitOr};

use url::Url;

use crate::value::Value;

/// The walking strategy an object asks for.
///
/// Returned by [`Reflect::shape`](crate::Reflect::shape). Anything that is not
/// a plain record with properties picks the variant matching its role; the
/// engine then never reads its properties.
#[derive(Clone)]
pub enum Shape<'a> {
    /// A record: walked through its properties.
    Object,
    /// A key/value container.
    Map(&'a dyn MapView),
    /// An ordered sequence.
    Seq(&'a dyn SeqView),
    /// A lazily evaluated query. Enumerating it could run arbitrary work, so
    /// it is never enumerated.
    Deferred,
    /// A URI, emitted as its canonical string.
    Uri(&'a Url),
    /// A cancellation signal.
    Cancellation {
        /// Whether cancellation was requested.
        requested: bool,
    },
    /// A handle to an asynchronous task.
    Task(TaskView),
    /// Type handles and member descriptors. Emitted as they are, never walked.
    Metadata,
}

impl fmt::Debug for Shape<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Object => f.write_str("Object"),
            Shape::Map(_) => f.write_str("Map(..)"),
            Shape::Seq(_) => f.write_str("Seq(..)"),
            Shape::Deferred => f.write_str("Deferred"),
            Shape::Uri(url) => f.debug_tuple("Uri").field(&url.as_str()).finish(),
            Shape::Cancellation { requested } => f
                .debug_struct("Cancellation")
                .field("requested", requested)
                .finish(),
            Shape::Task(task) => f.debug_tuple("Task").field(task).finish(),
            Shape::Metadata => f.write_str("Metadata"),
        }
    }
}

/// Read access to a key/value container.
pub trait MapView {
    /// A snapshot of the entries, in the container's iteration order.
    fn entries(&self) -> Vec<(Value, Value)>;

    /// Number of entries.
    fn len(&self) -> usize;

    /// Returns `true` if the container has no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Read access to an ordered sequence.
pub trait SeqView {
    /// A snapshot of the items, in order.
    fn items(&self) -> Vec<Value>;
}

/// What the engine records about a task handle.
#[derive(Clone, Debug)]
pub struct TaskView {
    /// Task identifier.
    pub id: u64,
    /// Current status.
    pub status: TaskStatus,
    /// Options the task was created with.
    pub creation_options: TaskCreationOptions,
    /// The exception the task faulted with. Only read when
    /// [`status`](Self::status) is [`TaskStatus::Faulted`].
    pub fault: Option<Value>,
}

/// Lifecycle state of a task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    /// Initialized but not scheduled.
    Created,
    /// Waiting to be activated by the runtime.
    WaitingForActivation,
    /// Scheduled but not running.
    WaitingToRun,
    /// Running.
    Running,
    /// Finished its own work, waiting for attached children.
    WaitingForChildrenToComplete,
    /// Completed successfully.
    RanToCompletion,
    /// Cancelled.
    Canceled,
    /// Completed with an exception.
    Faulted,
}

impl TaskStatus {
    /// The label emitted by the engine.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            TaskStatus::Created => "Created",
            TaskStatus::WaitingForActivation => "WaitingForActivation",
            TaskStatus::WaitingToRun => "WaitingToRun",
            TaskStatus::Running => "Running",
            TaskStatus::WaitingForChildrenToComplete => "WaitingForChildrenToComplete",
            TaskStatus::RanToCompletion => "RanToCompletion",
            TaskStatus::Canceled => "Canceled",
            TaskStatus::Faulted => "Faulted",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Flags a task was created with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TaskCreationOptions(u32);

impl TaskCreationOptions {
    /// No flags.
    pub const NONE: Self = Self(0);
    /// Schedule fairly.
    pub const PREFER_FAIRNESS: Self = Self(0x01);
    /// The task runs for a long time.
    pub const LONG_RUNNING: Self = Self(0x02);
    /// The task is attached to its parent.
    pub const ATTACHED_TO_PARENT: Self = Self(0x04);
    /// Children may not attach to this task.
    pub const DENY_CHILD_ATTACH: Self = Self(0x08);
    /// The ambient scheduler is hidden from the task.
    pub const HIDE_SCHEDULER: Self = Self(0x10);
    /// Continuations run asynchronously.
    pub const RUN_CONTINUATIONS_ASYNCHRONOUSLY: Self = Self(0x40);

    const NAMED: [(Self, &'static str); 6] = [
        (Self::PREFER_FAIRNESS, "PreferFairness"),
        (Self::LONG_RUNNING, "LongRunning"),
        (Self::ATTACHED_TO_PARENT, "AttachedToParent"),
        (Self::DENY_CHILD_ATTACH, "DenyChildAttach"),
        (Self::HIDE_SCHEDULER, "HideScheduler"),
        (Self::RUN_CONTINUATIONS_ASYNCHRONOUSLY, "RunContinuationsAsynchronously"),
    ];

    /// Creates the set from raw bits.
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// The raw bits.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns `true` if every flag of `other` is set.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Comma-separated flag names, `"None"` for the empty set. A set with
    /// undefined bits is rendered as its number.
    #[must_use]
    pub fn label(self) -> String {
        if self.0 == 0 {
            return "None".to_owned();
        }

        let mut remaining = self.0;
        let mut names = Vec::new();
        for (flag, name) in Self::NAMED {
            if self.contains(flag) {
                remaining &= !flag.0;
                names.push(name);
            }
        }

        if remaining == 0 {
            names.join(", ")
        } else {
            self.0.to_string()
        }
    }
}

impl BitOr for TaskCreationOptions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl fmt::Display for TaskCreationOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creation_option_labels() {
        assert_eq!(TaskCreationOptions::NONE.label(), "None");
        assert_eq!(
            (TaskCreationOptions::LONG_RUNNING | TaskCreationOptions::DENY_CHILD_ATTACH).label(),
            "LongRunning, DenyChildAttach"
        );
        assert_eq!(TaskCreationOptions::from_bits(0x20 | 0x01).label(), "33");
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(TaskStatus::RanToCompletion.to_string(), "RanToCompletion");
        assert_eq!(TaskStatus::Faulted.label(), "Faulted");
    }
}
