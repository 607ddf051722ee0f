//! System exceptions without properties of their own.

use super::{EXCEPTION, ExceptionCore};

crate::simple_exception! {
    /// Base type of the exceptions raised by the runtime.
    pub struct SystemException: ExceptionCore;
    pub static SYSTEM_EXCEPTION extends EXCEPTION;
}

crate::simple_exception! {
    /// A method call is invalid for the object's current state.
    pub struct InvalidOperationException: SystemException;
    pub static INVALID_OPERATION_EXCEPTION extends SYSTEM_EXCEPTION;
}

crate::simple_exception! {
    /// The invoked operation is not supported.
    pub struct NotSupportedException: SystemException;
    pub static NOT_SUPPORTED_EXCEPTION extends SYSTEM_EXCEPTION;
}

crate::simple_exception! {
    /// The invoked operation is not implemented.
    pub struct NotImplementedException: SystemException;
    pub static NOT_IMPLEMENTED_EXCEPTION extends SYSTEM_EXCEPTION;
}

crate::simple_exception! {
    /// An argument has an invalid format.
    pub struct FormatException: SystemException;
    pub static FORMAT_EXCEPTION extends SYSTEM_EXCEPTION;
}

crate::simple_exception! {
    /// An operation ran out of time.
    pub struct TimeoutException: SystemException;
    pub static TIMEOUT_EXCEPTION extends SYSTEM_EXCEPTION;
}

crate::simple_exception! {
    /// An arithmetic, casting or conversion operation failed.
    pub struct ArithmeticException: SystemException;
    pub static ARITHMETIC_EXCEPTION extends SYSTEM_EXCEPTION;
}

crate::simple_exception! {
    /// An integral or decimal value was divided by zero.
    pub struct DivideByZeroException: ArithmeticException;
    pub static DIVIDE_BY_ZERO_EXCEPTION extends ARITHMETIC_EXCEPTION;
}

#[cfg(test)]
mod tests {
    use exdetail_internals::Reflect;

    use super::*;
    use crate::exceptions::Exception;

    #[test]
    fn test_hierarchy() {
        let names: Vec<_> = DIVIDE_BY_ZERO_EXCEPTION.ancestors().map(|ty| ty.name()).collect();
        assert_eq!(
            names,
            [
                "DivideByZeroException",
                "ArithmeticException",
                "SystemException",
                "Exception"
            ]
        );
        assert_eq!(
            DIVIDE_BY_ZERO_EXCEPTION.full_name(),
            "exdetail::exceptions::system::DivideByZeroException"
        );
    }

    #[test]
    fn test_nested_parts() {
        let exception = DivideByZeroException::new("attempted to divide by zero");
        let erased: &dyn Reflect = &exception;

        assert!(erased.part::<ArithmeticException>().is_ok());
        assert!(erased.part::<SystemException>().is_ok());
        assert_eq!(
            erased.part::<ExceptionCore>().unwrap().message(),
            "attempted to divide by zero"
        );
        assert!(erased.part::<FormatException>().is_err());
        assert_eq!(exception.core().message(), "attempted to divide by zero");
    }
}
