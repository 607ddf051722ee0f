use core::fmt;
use std::{borrow::Cow, io};

use exdetail_internals::{PropertyDecl, Reflect, Scalar, Thrown, TypeInfo, Value};

use super::{ExceptionCore, SYSTEM_EXCEPTION, SystemException};

macro_rules! socket_errors {
    ($($variant:ident = $code:literal => $description:literal,)*) => {
        /// Error codes of socket operations.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        #[non_exhaustive]
        pub enum SocketError {
            $(
                #[doc = $description]
                $variant,
            )*
        }

        impl SocketError {
            /// The numeric error code.
            #[must_use]
            pub const fn code(self) -> i32 {
                match self {
                    $(SocketError::$variant => $code,)*
                }
            }

            /// The name of the error code.
            #[must_use]
            pub const fn label(self) -> &'static str {
                match self {
                    $(SocketError::$variant => stringify!($variant),)*
                }
            }

            /// What the error code means.
            #[must_use]
            pub const fn description(self) -> &'static str {
                match self {
                    $(SocketError::$variant => $description,)*
                }
            }

            /// The error with the given numeric code.
            #[must_use]
            pub const fn from_code(code: i32) -> Option<Self> {
                match code {
                    $($code => Some(SocketError::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

socket_errors! {
    Success = 0 => "The Socket operation succeeded.",
    SocketError = -1 => "An unspecified Socket error has occurred.",
    OperationAborted = 995 => "The overlapped operation was aborted due to the closure of the Socket.",
    IoPending = 997 => "The application has initiated an overlapped operation that cannot be completed immediately.",
    Interrupted = 10004 => "A blocking Socket call was canceled.",
    AccessDenied = 10013 => "An attempt was made to access a Socket in a way that is forbidden by its access permissions.",
    Fault = 10014 => "An invalid pointer address was detected by the underlying socket provider.",
    InvalidArgument = 10022 => "An invalid argument was supplied to a Socket member.",
    TooManyOpenSockets = 10024 => "There are too many open sockets in the underlying socket provider.",
    WouldBlock = 10035 => "An operation on a nonblocking socket cannot be completed immediately.",
    InProgress = 10036 => "A blocking operation is in progress.",
    AlreadyInProgress = 10037 => "The nonblocking Socket already has an operation in progress.",
    NotSocket = 10038 => "A Socket operation was attempted on a non-socket.",
    DestinationAddressRequired = 10039 => "A required address was omitted from an operation on a Socket.",
    MessageSize = 10040 => "The datagram is too long.",
    ProtocolType = 10041 => "The protocol type is incorrect for this Socket.",
    ProtocolOption = 10042 => "An unknown, invalid, or unsupported option or level was used with a Socket.",
    ProtocolNotSupported = 10043 => "The protocol is not implemented or has not been configured.",
    SocketNotSupported = 10044 => "The support for the specified socket type does not exist in this address family.",
    OperationNotSupported = 10045 => "The address family is not supported by the protocol family.",
    ProtocolFamilyNotSupported = 10046 => "The protocol family is not implemented or has not been configured.",
    AddressFamilyNotSupported = 10047 => "The address family specified is not supported.",
    AddressAlreadyInUse = 10048 => "Only one use of an address is normally permitted.",
    AddressNotAvailable = 10049 => "The selected IP address is not valid in this context.",
    NetworkDown = 10050 => "The network is not available.",
    NetworkUnreachable = 10051 => "No route to the remote host exists.",
    NetworkReset = 10052 => "The application tried to set KeepAlive on a connection that has already timed out.",
    ConnectionAborted = 10053 => "The connection was aborted by the runtime or the underlying socket provider.",
    ConnectionReset = 10054 => "The connection was reset by the remote peer.",
    NoBufferSpaceAvailable = 10055 => "No free buffer space is available for a Socket operation.",
    IsConnected = 10056 => "The Socket is already connected.",
    NotConnected = 10057 => "The application tried to send or receive data, and the Socket is not connected.",
    Shutdown = 10058 => "A request to send or receive data was disallowed because the Socket has already been closed.",
    TimedOut = 10060 => "The connection attempt timed out, or the connected host has failed to respond.",
    ConnectionRefused = 10061 => "The remote host is actively refusing a connection.",
    HostDown = 10064 => "The operation failed because the remote host is down.",
    HostUnreachable = 10065 => "There is no network route to the specified host.",
    ProcessLimit = 10067 => "Too many processes are using the underlying socket provider.",
    SystemNotReady = 10091 => "The network subsystem is unavailable.",
    VersionNotSupported = 10092 => "The version of the underlying socket provider is out of range.",
    NotInitialized = 10093 => "The underlying socket provider has not been initialized.",
    Disconnecting = 10101 => "A graceful shutdown is in progress.",
    TypeNotFound = 10109 => "The specified class was not found.",
    HostNotFound = 11001 => "No such host is known. The name is not an official host name or alias.",
    TryAgain = 11002 => "The name of the host could not be resolved. Try again later.",
    NoRecovery = 11003 => "The error is unrecoverable or the requested database cannot be located.",
    NoData = 11004 => "The requested name or IP address was not found on the name server.",
}

impl SocketError {
    /// Full name of the enumeration, as carried by its [`Scalar::Enum`] form.
    pub const TYPE_NAME: &'static str = concat!(module_path!(), "::SocketError");

    /// The error as an enumeration scalar.
    #[must_use]
    pub fn to_scalar(self) -> Scalar {
        Scalar::enumeration(Self::TYPE_NAME, self.label())
    }
}

impl fmt::Display for SocketError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<io::ErrorKind> for SocketError {
    fn from(kind: io::ErrorKind) -> Self {
        match kind {
            io::ErrorKind::PermissionDenied => SocketError::AccessDenied,
            io::ErrorKind::ConnectionRefused => SocketError::ConnectionRefused,
            io::ErrorKind::ConnectionReset => SocketError::ConnectionReset,
            io::ErrorKind::ConnectionAborted => SocketError::ConnectionAborted,
            io::ErrorKind::HostUnreachable => SocketError::HostUnreachable,
            io::ErrorKind::NetworkUnreachable => SocketError::NetworkUnreachable,
            io::ErrorKind::NetworkDown => SocketError::NetworkDown,
            io::ErrorKind::NotConnected => SocketError::NotConnected,
            io::ErrorKind::AddrInUse => SocketError::AddressAlreadyInUse,
            io::ErrorKind::AddrNotAvailable => SocketError::AddressNotAvailable,
            io::ErrorKind::WouldBlock => SocketError::WouldBlock,
            io::ErrorKind::InvalidInput => SocketError::InvalidArgument,
            io::ErrorKind::TimedOut => SocketError::TimedOut,
            io::ErrorKind::Interrupted => SocketError::Interrupted,
            io::ErrorKind::Unsupported => SocketError::OperationNotSupported,
            _ => SocketError::SocketError,
        }
    }
}

static SOCKET_EXCEPTION_PROPERTIES: [PropertyDecl; 2] = [
    PropertyDecl::new("SocketErrorCode", socket_error_code),
    PropertyDecl::new("ErrorCode", error_code),
];

/// Type descriptor of [`SocketException`].
pub static SOCKET_EXCEPTION: TypeInfo = TypeInfo::new::<SocketException>(
    "SocketException",
    concat!(module_path!(), "::SocketException"),
)
.extends(&SYSTEM_EXCEPTION)
.with_properties(&SOCKET_EXCEPTION_PROPERTIES);

fn socket_error_code(this: &dyn Reflect) -> Result<Value, Thrown> {
    Ok(this.part::<SocketException>()?.error.to_scalar().into())
}

fn error_code(this: &dyn Reflect) -> Result<Value, Thrown> {
    Ok(this.part::<SocketException>()?.error.code().into())
}

/// A socket operation failed.
///
/// # Examples
///
/// ```
/// use exdetail::exceptions::{SocketError, SocketException};
///
/// let io_error = std::io::Error::from(std::io::ErrorKind::ConnectionRefused);
/// let exception = SocketException::from_io_error(&io_error);
/// assert_eq!(exception.socket_error(), SocketError::ConnectionRefused);
/// ```
pub struct SocketException {
    base: SystemException,
    error: SocketError,
}

impl SocketException {
    /// Creates the exception with the description of `error` as message.
    #[must_use]
    pub fn new(error: SocketError) -> Self {
        Self::with_message(error, error.description())
    }

    /// Creates the exception with the given message.
    #[must_use]
    pub fn with_message(error: SocketError, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            base: SystemException::from(ExceptionCore::new(message)),
            error,
        }
    }

    /// Creates the exception from an I/O error, keeping its message.
    #[must_use]
    pub fn from_io_error(error: &io::Error) -> Self {
        Self::with_message(SocketError::from(error.kind()), error.to_string())
    }

    /// The socket error code.
    #[must_use]
    pub fn socket_error(&self) -> SocketError {
        self.error
    }
}

impl From<ExceptionCore> for SocketException {
    fn from(core: ExceptionCore) -> Self {
        Self {
            base: SystemException::from(core),
            error: SocketError::SocketError,
        }
    }
}

crate::__impl_exception!(SocketException, SOCKET_EXCEPTION);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exceptions::Exception;

    #[test]
    fn test_codes_round_trip() {
        assert_eq!(SocketError::ConnectionRefused.code(), 10061);
        assert_eq!(SocketError::from_code(10061), Some(SocketError::ConnectionRefused));
        assert_eq!(SocketError::from_code(12345), None);
    }

    #[test]
    fn test_default_message_is_the_description() {
        let exception = SocketException::new(SocketError::TimedOut);
        assert_eq!(
            exception.core().message(),
            "The connection attempt timed out, or the connected host has failed to respond."
        );
        assert_eq!(
            socket_error_code(&exception).unwrap(),
            Value::from(Scalar::enumeration(SocketError::TYPE_NAME, "TimedOut"))
        );
    }
}
