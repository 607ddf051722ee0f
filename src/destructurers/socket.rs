use exdetail_internals::TypeInfo;

use super::ExceptionDestructurer;
use crate::{
    bag::PropertiesBag,
    destructurer::{DestructureScope, Destructurer},
    error::BagError,
    exceptions::{Exception, SOCKET_EXCEPTION, SocketException},
};

static TARGETS: [&TypeInfo; 1] = [&SOCKET_EXCEPTION];

/// Adds the `SocketErrorCode` and its documented meaning as
/// `SocketErrorCodeMessage`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SocketExceptionDestructurer;

impl Destructurer for SocketExceptionDestructurer {
    fn target_types(&self) -> &[&'static TypeInfo] {
        &TARGETS
    }

    fn destructure(
        &self,
        exception: &dyn Exception,
        bag: &mut PropertiesBag<'_>,
        scope: &mut DestructureScope<'_>,
    ) -> Result<(), BagError> {
        ExceptionDestructurer.destructure(exception, bag, scope)?;
        if let Ok(socket) = exception.part::<SocketException>() {
            let error = socket.socket_error();
            bag.add_property("SocketErrorCode", error.to_scalar())?;
            bag.add_property("SocketErrorCodeMessage", error.description())?;
        }
        Ok(())
    }
}
