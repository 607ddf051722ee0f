//! The built-in destructurers.
//!
//! [`default_destructurers`] lists the type-specific ones registered by
//! default. [`ReflectionBasedDestructurer`] handles every other type unless it
//! is disabled.

use std::sync::Arc;

use crate::destructurer::Destructurer;

mod aggregate;
mod argument;
mod canceled;
mod exception;
mod reflection;
mod socket;
mod type_load;

pub use self::{
    aggregate::AggregateExceptionDestructurer,
    argument::{ArgumentExceptionDestructurer, ArgumentOutOfRangeExceptionDestructurer},
    canceled::{OperationCanceledExceptionDestructurer, TaskCanceledExceptionDestructurer},
    exception::{ExceptionDestructurer, extract_base_fields},
    reflection::ReflectionBasedDestructurer,
    socket::SocketExceptionDestructurer,
    type_load::ReflectionTypeLoadExceptionDestructurer,
};

/// The type-specific destructurers registered by default.
#[must_use]
pub fn default_destructurers() -> Vec<Arc<dyn Destructurer>> {
    vec![
        Arc::new(ExceptionDestructurer),
        Arc::new(ArgumentExceptionDestructurer),
        Arc::new(ArgumentOutOfRangeExceptionDestructurer),
        Arc::new(AggregateExceptionDestructurer),
        Arc::new(ReflectionTypeLoadExceptionDestructurer),
        Arc::new(OperationCanceledExceptionDestructurer),
        Arc::new(TaskCanceledExceptionDestructurer),
        Arc::new(SocketExceptionDestructurer),
    ]
}
