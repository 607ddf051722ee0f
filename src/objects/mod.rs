//! Built-in reflectable objects with special walking rules.
//!
//! Plain records are walked property by property. The objects in this module
//! instead report a dedicated [`Shape`](crate::Shape), so the value walker
//! treats them the way their role requires:
//!
//! | object | shape | emitted as |
//! |--------|-------|------------|
//! | [`Dictionary`] | map | string-keyed map of walked values |
//! | [`List`] | sequence | list of walked values |
//! | [`Uri`] | URI | its canonical string |
//! | [`CancellationToken`] | cancellation | `CancellationRequested` or `CancellationNotRequested` |
//! | [`TaskHandle`] | task | `Id`, `Status`, `CreationOptions` and the fault if any |
//! | [`DeferredQuery`] | deferred | a fixed marker, never evaluated |
//! | [`TypeHandle`], [`MemberHandle`] | metadata | left unexpanded |

mod cancellation;
mod dictionary;
mod list;
mod metadata;
mod query;
mod task;
mod uri;

pub use self::{
    cancellation::{CANCELLATION_TOKEN, CancellationToken},
    dictionary::{DICTIONARY, Dictionary},
    list::{LIST, List},
    metadata::{MEMBER_HANDLE, MemberHandle, TYPE_HANDLE, TypeHandle},
    query::{DEFERRED_QUERY, DeferredQuery},
    task::{TASK_HANDLE, TaskHandle},
    uri::{URI, Uri},
};
