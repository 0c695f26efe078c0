//! The closed error taxonomy, per spec.md §7 and
//! `examples/original_source/src/helics/core/core-exceptions.hpp`.
//!
//! Every public operation across `helics_interfaces`, `helics_time`,
//! `helics_federate` and `helics_broker` returns one of these variants
//! rather than a per-crate error type, so a caller crossing several of
//! those boundaries doesn't have to `match` on a growing union.

use thiserror::Error;

/// Stable numeric code mirroring the C++ core's `helics_error_code` values,
/// kept distinct from the `Error` enum itself so it can travel over the wire
/// and through the C API without pulling the message string along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    RegistrationFailure = -1,
    ConnectionFailure = -2,
    InvalidObject = -3,
    InvalidArgument = -4,
    DiscardMessage = -5,
    SystemFailure = -6,
    Disconnected = -7,
    NotEnoughTimeGranted = -8,
    UserAbort = -9,
    InvalidState = -10,
    InvalidFunctionCall = -11,
}

/// The error taxonomy shared by every component of the federation core.
#[derive(Debug, Error)]
pub enum Error {
    /// A federate, interface or broker name collided with one already
    /// registered, or registration was attempted after the registration
    /// window closed (`core-exceptions.hpp`'s `RegistrationFailure`).
    #[error("registration failure: {0}")]
    RegistrationFailure(String),

    /// An operation referenced an id, name or handle that the core has no
    /// record of (`InvalidIdentifier`).
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// An argument was out of range, malformed, or otherwise rejected before
    /// any state change was attempted (`InvalidParameter`).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The call was made while the federate/broker was in a state that
    /// doesn't allow it, e.g. registering an interface after
    /// `enterExecutingMode` (`InvalidFunctionCall`).
    #[error("invalid function call in current state: {0}")]
    InvalidFunctionCall(String),

    /// A transport-level connection could not be established or was lost
    /// (`ConnectionFailure`).
    #[error("connection failure: {0}")]
    ConnectionFailure(String),

    /// Encoding or decoding a value or message failed (`FunctionExecutionFailure`).
    #[error("function execution failure: {0}")]
    FunctionExecutionFailure(String),

    /// An internal invariant was violated; this indicates a bug in the core
    /// rather than caller misuse (`HelicsSystemFailure`).
    #[error("system failure: {0}")]
    SystemFailure(String),

    /// The federation (or the specific federate/broker) has already
    /// disconnected and cannot accept further calls.
    #[error("federate or broker has disconnected")]
    Disconnected,
}

impl Error {
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::RegistrationFailure(_) => ErrorCode::RegistrationFailure,
            Error::InvalidIdentifier(_) => ErrorCode::InvalidObject,
            Error::InvalidParameter(_) => ErrorCode::InvalidArgument,
            Error::InvalidFunctionCall(_) => ErrorCode::InvalidFunctionCall,
            Error::ConnectionFailure(_) => ErrorCode::ConnectionFailure,
            Error::FunctionExecutionFailure(_) => ErrorCode::SystemFailure,
            Error::SystemFailure(_) => ErrorCode::SystemFailure,
            Error::Disconnected => ErrorCode::Disconnected,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_mapping() {
        assert_eq!(
            Error::InvalidFunctionCall("enterExecutingMode called twice".into()).code(),
            ErrorCode::InvalidFunctionCall
        );
        assert_eq!(Error::Disconnected.code(), ErrorCode::Disconnected);
    }
}
