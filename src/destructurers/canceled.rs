use exdetail_internals::{TaskStatus, TypeInfo};

use super::ExceptionDestructurer;
use crate::{
    bag::PropertiesBag,
    destructurer::{DestructureScope, Destructurer},
    detail::{Detail, DetailMap},
    error::BagError,
    exceptions::{
        Exception, OPERATION_CANCELED_EXCEPTION, OperationCanceledException,
        TASK_CANCELED_EXCEPTION, TaskCanceledException,
    },
    objects::TaskHandle,
    walk::cancellation_label,
};

static OPERATION_CANCELED_TARGETS: [&TypeInfo; 1] = [&OPERATION_CANCELED_EXCEPTION];

/// Adds the state of the `CancellationToken`.
#[derive(Clone, Copy, Debug, Default)]
pub struct OperationCanceledExceptionDestructurer;

impl Destructurer for OperationCanceledExceptionDestructurer {
    fn target_types(&self) -> &[&'static TypeInfo] {
        &OPERATION_CANCELED_TARGETS
    }

    fn destructure(
        &self,
        exception: &dyn Exception,
        bag: &mut PropertiesBag<'_>,
        scope: &mut DestructureScope<'_>,
    ) -> Result<(), BagError> {
        ExceptionDestructurer.destructure(exception, bag, scope)?;
        if let Ok(canceled) = exception.part::<OperationCanceledException>() {
            let requested = canceled.cancellation_token().is_cancellation_requested();
            bag.add_property("CancellationToken", cancellation_label(requested))?;
        }
        Ok(())
    }
}

static TASK_CANCELED_TARGETS: [&TypeInfo; 1] = [&TASK_CANCELED_EXCEPTION];

/// Adds the state of the `CancellationToken` and the cancelled `Task`, null
/// when unknown.
#[derive(Clone, Copy, Debug, Default)]
pub struct TaskCanceledExceptionDestructurer;

impl Destructurer for TaskCanceledExceptionDestructurer {
    fn target_types(&self) -> &[&'static TypeInfo] {
        &TASK_CANCELED_TARGETS
    }

    fn destructure(
        &self,
        exception: &dyn Exception,
        bag: &mut PropertiesBag<'_>,
        scope: &mut DestructureScope<'_>,
    ) -> Result<(), BagError> {
        OperationCanceledExceptionDestructurer.destructure(exception, bag, scope)?;
        let Ok(canceled) = exception.part::<TaskCanceledException>() else {
            return Ok(());
        };

        let task = match canceled.task() {
            Some(task) => Detail::Map(destructure_task(task, scope)?),
            None => Detail::Null,
        };
        bag.add_property("Task", task)
    }
}

fn destructure_task(
    task: &TaskHandle,
    scope: &DestructureScope<'_>,
) -> Result<DetailMap, BagError> {
    let mut detail = DetailMap::new();
    detail.insert("Id", task.id());
    detail.insert("Status", task.status().label());
    detail.insert("CreationOptions", task.creation_options().label());
    if task.status() == TaskStatus::Faulted
        && let Some(fault) = task.exception()
    {
        detail.insert("Exception", scope.destructure_exception(&**fault)?);
    }
    Ok(detail)
}
